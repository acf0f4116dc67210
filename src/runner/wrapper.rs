//! The SonarQube build wrapper.

use std::collections::HashMap;
use std::io::Write;

use crate::config::{SonarConfig, SonarInstallation};
use crate::environment::{self, vars};
use crate::error::{Result, SonarEnvError};
use crate::secrets::{decorate, MaskingWriter, SecretMatcher, SecretSet};
use crate::ui::UserInterface;

/// Wraps a build step with the environment of one SonarQube installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildWrapper {
    /// Name of the installation to inject.
    pub installation_name: String,
}

impl BuildWrapper {
    /// Create a wrapper for the named installation.
    pub fn new(installation_name: impl Into<String>) -> Self {
        Self {
            installation_name: installation_name.into(),
        }
    }

    /// Whether the wrapper may run at all.
    pub fn is_applicable(config: &SonarConfig) -> bool {
        config.settings.build_wrapper_enabled
    }

    /// The installation this wrapper targets, if configured.
    pub fn installation(&self, config: &SonarConfig) -> Option<SonarInstallation> {
        config.installation(&self.installation_name)
    }

    /// Resolve the step environment.
    ///
    /// An unknown installation is reported through `ui` as a fatal error
    /// and `existing` is left untouched.
    pub fn set_up(
        &self,
        config: &SonarConfig,
        existing: &HashMap<String, String>,
        ui: &mut dyn UserInterface,
    ) -> Result<SonarEnvironment> {
        let Some(installation) = self.installation(config) else {
            let err = SonarEnvError::ConfigurationNotFound {
                name: self.installation_name.clone(),
            };
            tracing::debug!(installation = %self.installation_name, "installation not configured");
            ui.fatal_error(&err.to_string());
            return Err(err);
        };

        let mut env = existing.clone();
        environment::inject(&installation, &mut env, ui);
        env.retain(|name, _| vars::ALL.contains(&name.as_str()));

        Ok(SonarEnvironment { installation, env })
    }

    /// Wrap `sink` in a filter masking the secrets of this wrapper's
    /// installation.
    ///
    /// With no matching installation the filter masks nothing.
    pub fn decorate_logger<W: Write>(
        &self,
        config: &SonarConfig,
        host_env: &HashMap<String, String>,
        sink: Option<W>,
    ) -> Option<MaskingWriter<W>> {
        let secrets = match self.installation(config) {
            Some(installation) => {
                let resolved = environment::resolve_installation(&installation, host_env);
                step_secrets(config, &installation, &resolved, host_env)
            }
            None => SecretSet::new(),
        };
        decorate(sink, &secrets)
    }
}

/// The resolved environment of a build step.
#[derive(Debug, Clone)]
pub struct SonarEnvironment {
    installation: SonarInstallation,
    env: HashMap<String, String>,
}

impl SonarEnvironment {
    /// The installation in use.
    pub fn installation(&self) -> &SonarInstallation {
        &self.installation
    }

    /// The injected `SONAR_*` variables.
    pub fn vars(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// Merge the injected variables into `env`.
    pub fn build_env_vars(&self, env: &mut HashMap<String, String>) {
        env.extend(self.env.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Secrets to mask in the step's output.
    pub fn secrets(&self, config: &SonarConfig, host_env: &HashMap<String, String>) -> SecretSet {
        step_secrets(config, &self.installation, &self.env, host_env)
    }

    /// Report where the analysis results went.
    pub fn tear_down(&self, ui: &mut dyn UserInterface) {
        let url = self
            .env
            .get(vars::SONAR_HOST_URL)
            .map(String::as_str)
            .unwrap_or_default();
        if url.is_empty() {
            return;
        }

        tracing::info!(server_url = %url, "build step finished");
        ui.info(&format!("SonarQube analysis reported to {}", url));
    }
}

/// Every secret of a build step.
///
/// Collects the installation's configured passwords, their resolved values
/// in `resolved`, the host variables named in `settings.secret_env` and,
/// with `settings.mask_host_secrets`, host variables whose names look
/// secret.
pub fn step_secrets(
    config: &SonarConfig,
    installation: &SonarInstallation,
    resolved: &HashMap<String, String>,
    host_env: &HashMap<String, String>,
) -> SecretSet {
    let mut secrets = SecretSet::for_installation(installation);

    secrets.extend(
        vars::SECRET
            .iter()
            .filter_map(|name| resolved.get(*name))
            .map(String::as_str),
    );

    let matcher = if config.settings.mask_host_secrets {
        SecretMatcher::with_builtins_and_custom(&config.settings.secret_env)
    } else {
        SecretMatcher::with_custom(&config.settings.secret_env)
    };
    secrets.merge(SecretSet::from_host_env(host_env, &matcher));

    tracing::debug!(count = secrets.len(), "collected step secrets");
    secrets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    fn test_config() -> SonarConfig {
        let mut config = SonarConfig::default();
        let installation = SonarInstallation {
            login: Some("$SONAR_CONFIG_NAME".to_string()),
            password: Some("password".to_string()),
            additional_properties: Some("key=value".to_string()),
            additional_args: Some("-X".to_string()),
            ..SonarInstallation::new("local", "http://localhost:9001")
        };
        config
            .installations
            .insert("local".to_string(), installation);
        config
    }

    #[test]
    fn applicable_unless_disabled() {
        let mut config = test_config();
        assert!(BuildWrapper::is_applicable(&config));
        config.settings.build_wrapper_enabled = false;
        assert!(!BuildWrapper::is_applicable(&config));
    }

    #[test]
    fn set_up_builds_env_vars() {
        let mut ui = MockUI::new();
        let mut env = HashMap::new();
        env.insert("key".to_string(), "value".to_string());

        let sonar = BuildWrapper::new("local")
            .set_up(&test_config(), &env, &mut ui)
            .unwrap();
        sonar.build_env_vars(&mut env);

        assert_eq!(env["SONAR_LOGIN"], "local");
        assert_eq!(env["SONAR_EXTRA_PROPS"], "-Dkey=value -X");
        assert_eq!(env["key"], "value");
        assert_eq!(ui.infos().len(), 1);
        assert!(ui.infos()[0].ends_with("using the configuration: local"));
    }

    #[test]
    fn set_up_with_unknown_installation_is_fatal() {
        let mut ui = MockUI::new();

        let result = BuildWrapper::new("other").set_up(&test_config(), &HashMap::new(), &mut ui);

        assert!(matches!(
            result,
            Err(SonarEnvError::ConfigurationNotFound { .. })
        ));
        assert_eq!(ui.fatal_errors().len(), 1);
        assert!(ui.fatal_errors()[0].contains("does not match"));
        assert!(ui.infos().is_empty());
    }

    #[test]
    fn tear_down_reports_server_url() {
        let mut ui = MockUI::new();
        let sonar = BuildWrapper::new("local")
            .set_up(&test_config(), &HashMap::new(), &mut ui)
            .unwrap();

        sonar.tear_down(&mut ui);

        assert!(ui.infos()[1].contains("http://localhost:9001"));
    }

    #[test]
    fn tear_down_is_quiet_without_server_url() {
        let mut config = SonarConfig::default();
        config
            .installations
            .insert("bare".to_string(), SonarInstallation::default());
        let mut ui = MockUI::new();

        let sonar = BuildWrapper::new("bare")
            .set_up(&config, &HashMap::new(), &mut ui)
            .unwrap();
        sonar.tear_down(&mut ui);

        assert_eq!(ui.infos().len(), 1);
    }

    #[test]
    fn decorate_logger_masks_password() {
        let mut log = Vec::new();
        {
            let mut out = BuildWrapper::new("local")
                .decorate_logger(&test_config(), &HashMap::new(), Some(&mut log))
                .unwrap();
            writeln!(out, "the pass is: password").unwrap();
        }
        assert_eq!(log, b"the pass is: ******\n");
    }

    #[test]
    fn decorate_logger_masks_default_database_password() {
        let mut log = Vec::new();
        {
            let mut out = BuildWrapper::new("local")
                .decorate_logger(&test_config(), &HashMap::new(), Some(&mut log))
                .unwrap();
            out.write_all(b"test sonar\ntest something\n").unwrap();
        }
        assert_eq!(log, b"test ******\ntest something\n");
    }

    #[test]
    fn decorate_logger_without_installation_is_transparent() {
        let out = BuildWrapper::new("missing")
            .decorate_logger(&test_config(), &HashMap::new(), Some(Vec::new()))
            .unwrap();
        assert!(out.is_transparent());
    }

    #[test]
    fn decorate_logger_without_sink_is_none() {
        assert!(BuildWrapper::new("local")
            .decorate_logger(&test_config(), &HashMap::new(), None::<Vec<u8>>)
            .is_none());
    }

    #[test]
    fn secrets_include_resolved_password() {
        let mut config = test_config();
        if let Some(installation) = config.installations.get_mut("local") {
            installation.password = Some("$CI_SONAR_PASSWORD".to_string());
        }
        let mut host = HashMap::new();
        host.insert("CI_SONAR_PASSWORD".to_string(), "hunter2".to_string());

        let sonar = BuildWrapper::new("local")
            .set_up(&config, &host, &mut MockUI::new())
            .unwrap();
        let secrets = sonar.secrets(&config, &host);

        assert!(secrets.contains("hunter2"));
        assert!(secrets.contains("sonar"));
    }

    #[test]
    fn secrets_include_named_host_variables() {
        let mut config = test_config();
        config.settings.secret_env = vec!["DEPLOY_KEY".to_string()];
        let mut host = HashMap::new();
        host.insert("DEPLOY_KEY".to_string(), "k3y".to_string());
        host.insert("GITHUB_TOKEN".to_string(), "ghp_x".to_string());

        let installation = config.installation("local").unwrap();
        let secrets = step_secrets(&config, &installation, &HashMap::new(), &host);

        assert!(secrets.contains("k3y"));
        assert!(!secrets.contains("ghp_x"));
    }

    #[test]
    fn secrets_include_pattern_matched_host_variables_when_enabled() {
        let mut config = test_config();
        config.settings.mask_host_secrets = true;
        let mut host = HashMap::new();
        host.insert("GITHUB_TOKEN".to_string(), "ghp_x".to_string());
        host.insert("HOME".to_string(), "/home/ci".to_string());

        let installation = config.installation("local").unwrap();
        let secrets = step_secrets(&config, &installation, &HashMap::new(), &host);

        assert!(secrets.contains("ghp_x"));
        assert!(!secrets.contains("/home/ci"));
    }
}
