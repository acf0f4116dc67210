//! SonarQube environment resolution.
//!
//! Resolution runs in two passes so values may reference variables that
//! are only defined by the resolution itself:
//!
//! 1. [`assemble`] collects the raw value of every `SONAR_*` variable
//! 2. [`expand`] substitutes `$VAR` references in each value against the
//!    assembled values first, then the host environment
//!
//! Expansion is one level deep: a reference to a value that itself holds a
//! reference yields that value's raw text.

use std::collections::HashMap;

use crate::config::{resolve_string, InterpolationContext, SonarConfig, SonarInstallation};
use crate::error::{Result, SonarEnvError};
use crate::ui::UserInterface;

use super::vars;

/// Goal used when no plugin version is pinned.
pub const DEFAULT_MAVEN_GOAL: &str = "sonar:sonar";

/// Debug flag always present in the extra properties.
pub const DEBUG_FLAG: &str = "-X";

/// Maven goal for an optional sonar-maven-plugin version.
///
/// ```
/// use sonar_env::environment::maven_goal;
///
/// assert_eq!(maven_goal(None), "sonar:sonar");
/// assert_eq!(maven_goal(Some("2.0")), "org.codehaus.mojo:sonar-maven-plugin:2.0:sonar");
/// ```
pub fn maven_goal(mojo_version: Option<&str>) -> String {
    match mojo_version.map(str::trim).filter(|v| !v.is_empty()) {
        Some(version) => format!("org.codehaus.mojo:sonar-maven-plugin:{}:sonar", version),
        None => DEFAULT_MAVEN_GOAL.to_string(),
    }
}

/// Extra analysis arguments.
///
/// Every whitespace-separated token of `properties` becomes `-D<token>`,
/// followed by the tokens of `args`, followed by `-X` unless a `-X`
/// token is already present among `args`, not necessarily trailing.
///
/// ```
/// use sonar_env::environment::extra_properties;
///
/// assert_eq!(extra_properties(Some("key=value"), None), "-Dkey=value -X");
/// assert_eq!(extra_properties(None, None), "-X");
/// assert_eq!(extra_properties(Some("key=value"), Some("-X")), "-Dkey=value -X");
/// assert_eq!(extra_properties(None, Some("-X -e")), "-X -e");
/// ```
pub fn extra_properties(properties: Option<&str>, args: Option<&str>) -> String {
    let mut tokens: Vec<String> = properties
        .unwrap_or_default()
        .split_whitespace()
        .map(|property| format!("-D{}", property))
        .collect();

    tokens.extend(
        args.unwrap_or_default()
            .split_whitespace()
            .map(str::to_string),
    );

    if !tokens.iter().any(|token| token == DEBUG_FLAG) {
        tokens.push(DEBUG_FLAG.to_string());
    }

    tokens.join(" ")
}

/// First pass: raw values of every injected variable.
///
/// Unset optional fields become empty strings so every key is present.
pub fn assemble(installation: &SonarInstallation) -> HashMap<String, String> {
    let or_empty = |value: &Option<String>| value.clone().unwrap_or_default();

    [
        (vars::SONAR_HOST_URL, installation.server_url.clone()),
        (vars::SONAR_CONFIG_NAME, installation.name.clone()),
        (vars::SONAR_LOGIN, or_empty(&installation.login)),
        (vars::SONAR_PASSWORD, or_empty(&installation.password)),
        (vars::SONAR_JDBC_URL, or_empty(&installation.database_url)),
        (vars::SONAR_JDBC_USERNAME, or_empty(&installation.database_login)),
        (vars::SONAR_JDBC_PASSWORD, or_empty(&installation.database_password)),
        (vars::SONAR_MAVEN_GOAL, maven_goal(installation.mojo_version())),
        (
            vars::SONAR_EXTRA_PROPS,
            extra_properties(
                installation.additional_properties.as_deref(),
                installation.additional_args.as_deref(),
            ),
        ),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect()
}

/// Second pass: expand references in every assembled value.
pub fn expand(
    assembled: &HashMap<String, String>,
    existing: &HashMap<String, String>,
) -> HashMap<String, String> {
    let context = InterpolationContext::new()
        .with_defined(assembled.clone())
        .with_env(existing.clone());

    assembled
        .iter()
        .map(|(name, value)| (name.clone(), resolve_string(value, &context)))
        .collect()
}

/// The resolved `SONAR_*` variables of one installation.
///
/// Pure: the same installation and host environment always give the same
/// mapping.
pub fn resolve_installation(
    installation: &SonarInstallation,
    existing: &HashMap<String, String>,
) -> HashMap<String, String> {
    expand(&assemble(installation), existing)
}

/// Merge an installation's variables into `env`, announcing it on `ui`.
///
/// Unrelated keys are kept; keys this crate defines are overwritten.
pub fn inject(
    installation: &SonarInstallation,
    env: &mut HashMap<String, String>,
    ui: &mut dyn UserInterface,
) {
    let message = format!(
        "Injecting SonarQube environment variables using the configuration: {}",
        installation.name
    );
    tracing::info!(installation = %installation.name, "{}", message);
    ui.info(&message);

    let resolved = resolve_installation(installation, env);
    env.extend(resolved);
}

/// Look up `name` in `config` and return `existing` with its variables merged in.
///
/// # Errors
///
/// Returns `ConfigurationNotFound` when no installation is called `name`;
/// `existing` is left untouched in that case.
pub fn resolve(
    config: &SonarConfig,
    name: &str,
    existing: &HashMap<String, String>,
    ui: &mut dyn UserInterface,
) -> Result<HashMap<String, String>> {
    let installation =
        config
            .installation(name)
            .ok_or_else(|| SonarEnvError::ConfigurationNotFound {
                name: name.to_string(),
            })?;

    let mut env = existing.clone();
    inject(&installation, &mut env, ui);
    Ok(env)
}
