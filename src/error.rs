//! Error types for sonar-env operations.
//!
//! This module defines [`SonarEnvError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - [`SonarEnvError::ConfigurationNotFound`] is fatal for a build step: the
//!   host reports it and must not run the step's action
//! - Sink write failures surface as [`SonarEnvError::Io`] unchanged
//! - Use `anyhow::Error` (via `SonarEnvError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sonar-env operations.
#[derive(Debug, Error)]
pub enum SonarEnvError {
    /// The requested installation name has no matching configuration.
    #[error("SonarQube installation '{name}' does not match any configured installation")]
    ConfigurationNotFound { name: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// The build wrapper is switched off in the settings.
    #[error("The SonarQube build wrapper is disabled (settings.build_wrapper_enabled is false)")]
    BuildWrapperDisabled,

    /// The build step command could not be started or waited on.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for sonar-env operations.
pub type Result<T> = std::result::Result<T, SonarEnvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_not_found_says_does_not_match() {
        let err = SonarEnvError::ConfigurationNotFound {
            name: "missing".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("missing"));
        assert!(msg.contains("does not match"));
    }

    #[test]
    fn config_not_found_displays_path() {
        let err = SonarEnvError::ConfigNotFound {
            path: PathBuf::from("/foo/config.yml"),
        };
        assert!(err.to_string().contains("/foo/config.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = SonarEnvError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn build_wrapper_disabled_mentions_setting() {
        let msg = SonarEnvError::BuildWrapperDisabled.to_string();
        assert!(msg.contains("build_wrapper_enabled"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SonarEnvError::CommandFailed {
            command: "mvn verify".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("mvn verify"));
        assert!(msg.contains('1'));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed");
        let err: SonarEnvError = io_err.into();
        assert!(matches!(err, SonarEnvError::Io(_)));
    }
}
