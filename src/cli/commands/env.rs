//! Env command implementation.
//!
//! The `sonar-env env` command prints the resolved `SONAR_*` variables of
//! one installation, ready to `eval` or load as a dotenv file.

use std::collections::{BTreeMap, HashMap};

use crate::cli::args::{EnvArgs, EnvFormat};
use crate::environment::vars;
use crate::error::{Result, SonarEnvError};
use crate::runner::BuildWrapper;
use crate::secrets::Masker;
use crate::ui::UserInterface;

use super::context::{select_installation, CommandContext, EXIT_NO_CONFIG};
use super::dispatcher::{Command, CommandResult};

/// The env command implementation.
pub struct EnvCommand {
    context: CommandContext,
    args: EnvArgs,
}

impl EnvCommand {
    /// Create a new env command.
    pub fn new(context: CommandContext, args: EnvArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &EnvArgs {
        &self.args
    }
}

impl Command for EnvCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.context.load_config(ui)? else {
            return Ok(CommandResult::failure(EXIT_NO_CONFIG));
        };

        let Some(name) = select_installation(&config, self.args.installation.as_deref(), ui)
        else {
            return Ok(CommandResult::failure(1));
        };

        let host_env = self.context.host_env();
        let sonar = match BuildWrapper::new(name).set_up(&config, host_env, ui) {
            Ok(sonar) => sonar,
            // Already reported as fatal by the wrapper
            Err(SonarEnvError::ConfigurationNotFound { .. }) => {
                return Ok(CommandResult::failure(1))
            }
            Err(e) => return Err(e),
        };

        let rendered = if self.args.mask {
            let masker = Masker::new(&sonar.secrets(&config, host_env));
            render(&mask_values(sonar.vars(), &masker), self.args.format)?
        } else {
            render(sonar.vars(), self.args.format)?
        };

        for line in rendered.lines() {
            ui.message(line);
        }

        Ok(CommandResult::success())
    }
}

/// Mask every value before it is quoted, so escaping cannot hide a secret.
fn mask_values(env: &HashMap<String, String>, masker: &Masker) -> HashMap<String, String> {
    env.iter()
        .map(|(name, value)| (name.clone(), masker.mask(value)))
        .collect()
}

/// Render the variables in the requested format, in display order.
pub fn render(env: &HashMap<String, String>, format: EnvFormat) -> Result<String> {
    let ordered = vars::ALL
        .iter()
        .filter_map(|name| env.get(*name).map(|value| (*name, value.as_str())));

    let text = match format {
        EnvFormat::Shell => ordered
            .map(|(name, value)| format!("export {}={}", name, shell_quote(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        EnvFormat::Dotenv => ordered
            .map(|(name, value)| format!("{}={}", name, dotenv_quote(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        EnvFormat::Json => {
            let map: BTreeMap<&str, &str> = ordered.collect();
            serde_json::to_string_pretty(&map).map_err(anyhow::Error::from)?
        }
    };

    Ok(text)
}

/// Single-quote a value for POSIX shells.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Double-quote a value for dotenv files.
fn dotenv_quote(value: &str) -> String {
    let escaped = value
        .replace('\\', r"\\")
        .replace('"', "\\\"")
        .replace('\n', r"\n");
    format!("\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
installations:
  local:
    server_url: http://localhost:9001
    login: $SONAR_CONFIG_NAME
    password: password
    additional_properties: key=value
    additional_args: -X
"#;

    fn context_with(config: &str) -> (TempDir, CommandContext) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, config).unwrap();
        let context = CommandContext::new(temp.path())
            .with_config(Some(path))
            .with_host_env(HashMap::new());
        (temp, context)
    }

    fn run_env(args: EnvArgs) -> (CommandResult, MockUI) {
        let (_temp, context) = context_with(CONFIG);
        let mut ui = MockUI::new();
        let result = EnvCommand::new(context, args).execute(&mut ui).unwrap();
        (result, ui)
    }

    #[test]
    fn prints_shell_exports() {
        let (result, ui) = run_env(EnvArgs::default());

        assert!(result.success);
        assert_eq!(ui.messages().len(), vars::ALL.len());
        assert_eq!(ui.messages()[0], "export SONAR_HOST_URL='http://localhost:9001'");
        assert!(ui
            .messages()
            .contains(&"export SONAR_LOGIN='local'".to_string()));
        assert!(ui
            .messages()
            .contains(&"export SONAR_EXTRA_PROPS='-Dkey=value -X'".to_string()));
        assert_eq!(ui.infos().len(), 1);
    }

    #[test]
    fn masks_secret_values() {
        let (_, ui) = run_env(EnvArgs {
            mask: true,
            ..Default::default()
        });

        assert!(ui
            .messages()
            .contains(&"export SONAR_PASSWORD='******'".to_string()));
        assert!(!ui.messages().iter().any(|m| m.contains("password'")));
    }

    #[test]
    fn prints_json() {
        let (_, ui) = run_env(EnvArgs {
            format: EnvFormat::Json,
            ..Default::default()
        });

        let json: serde_json::Value = serde_json::from_str(&ui.messages().join("\n")).unwrap();
        assert_eq!(json["SONAR_MAVEN_GOAL"], "sonar:sonar");
        assert_eq!(json["SONAR_JDBC_URL"], "");
    }

    #[test]
    fn prints_dotenv() {
        let (_, ui) = run_env(EnvArgs {
            format: EnvFormat::Dotenv,
            ..Default::default()
        });

        assert!(ui
            .messages()
            .contains(&"SONAR_CONFIG_NAME=\"local\"".to_string()));
    }

    #[test]
    fn unknown_installation_fails() {
        let (result, ui) = run_env(EnvArgs {
            installation: Some("other".to_string()),
            ..Default::default()
        });

        assert_eq!(result.exit_code, 1);
        assert!(ui.fatal_errors()[0].contains("does not match"));
        assert!(ui.messages().is_empty());
    }

    #[test]
    fn missing_config_exits_with_two() {
        let temp = TempDir::new().unwrap();
        let context = CommandContext::new(temp.path())
            .with_config(Some(temp.path().join("missing.yml")));
        let mut ui = MockUI::new();

        let result = EnvCommand::new(context, EnvArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, EXIT_NO_CONFIG);
    }

    #[test]
    fn masks_secrets_that_need_escaping_in_every_format() {
        let config = r#"
installations:
  local:
    server_url: http://localhost:9001
    password: 'it''s"s3c\ret'
"#;

        for format in [EnvFormat::Shell, EnvFormat::Dotenv, EnvFormat::Json] {
            let (_temp, context) = context_with(config);
            let mut ui = MockUI::new();
            let args = EnvArgs {
                format,
                mask: true,
                ..Default::default()
            };

            let result = EnvCommand::new(context, args).execute(&mut ui).unwrap();
            let output = ui.messages().join("\n");

            assert!(result.success);
            assert!(!output.contains("s3c"), "{:?} leaked: {}", format, output);
            assert!(output.contains("******"), "{:?} not masked: {}", format, output);
        }
    }

    #[test]
    fn shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn dotenv_quote_escapes() {
        assert_eq!(dotenv_quote("a\"b\\c"), r#""a\"b\\c""#);
    }
}
