//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - Installation names must be non-blank and free of whitespace
//! - Server URLs, when set, must be http(s) URLs
//! - Mojo versions must be a single token
//! - Secret environment names in the settings must be non-blank

use crate::config::schema::SonarConfig;
use crate::error::{Result, SonarEnvError};

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Installation name if the error is installation-specific
    pub installation: Option<String>,
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &SonarConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_installations(config));
    errors.extend(validate_settings(config));

    errors
}

fn validate_installations(config: &SonarConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, installation) in &config.installations {
        let error = |rule: &str, message: String| ValidationError {
            rule: rule.to_string(),
            message,
            installation: Some(name.clone()),
        };

        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            errors.push(error(
                "invalid-name",
                format!("Installation name '{}' must be non-empty without whitespace", name),
            ));
        }

        let url = installation.server_url.trim();
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(error(
                "invalid-server-url",
                format!(
                    "Installation '{}' has server_url '{}' which is not an http(s) URL",
                    name, url
                ),
            ));
        }

        if let Some(version) = installation.mojo_version() {
            if version.chars().any(char::is_whitespace) {
                errors.push(error(
                    "invalid-mojo-version",
                    format!(
                        "Installation '{}' has mojo_version '{}' containing whitespace",
                        name, version
                    ),
                ));
            }
        }
    }

    errors
}

fn validate_settings(config: &SonarConfig) -> Vec<ValidationError> {
    config
        .settings
        .secret_env
        .iter()
        .filter(|name| name.trim().is_empty())
        .map(|_| ValidationError {
            rule: "blank-secret-env".to_string(),
            message: "settings.secret_env contains a blank variable name".to_string(),
            installation: None,
        })
        .collect()
}

/// Validate and return Result (for convenience).
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &SonarConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(SonarEnvError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
