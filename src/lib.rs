//! sonar-env - SonarQube environment injection for CI build steps.
//!
//! sonar-env resolves the `SONAR_*` variables of a configured SonarQube
//! installation, injects them into a build step and masks the
//! installation's secrets in everything the step prints.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`environment`] - `SONAR_*` variable resolution
//! - [`error`] - Error types and result aliases
//! - [`runner`] - The build wrapper around one build step
//! - [`secrets`] - Secret collection and output masking
//! - [`shell`] - Build step process execution
//! - [`ui`] - Listener abstraction and terminal output
//!
//! # Example
//!
//! ```
//! use sonar_env::config::SonarInstallation;
//! use sonar_env::environment::resolve_installation;
//! use std::collections::HashMap;
//!
//! let mut installation = SonarInstallation::new("local", "http://localhost:9001");
//! installation.login = Some("$SONAR_CONFIG_NAME".to_string());
//!
//! let env = resolve_installation(&installation, &HashMap::new());
//! assert_eq!(env["SONAR_LOGIN"], "local");
//! assert_eq!(env["SONAR_EXTRA_PROPS"], "-X");
//! ```
//!
//! For file-based config loading, see the integration tests.

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod runner;
pub mod secrets;
pub mod shell;
pub mod ui;

pub use error::{Result, SonarEnvError};
