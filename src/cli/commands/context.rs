//! State shared by every command.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{load_config, validate, SonarConfig};
use crate::error::{Result, SonarEnvError};
use crate::ui::UserInterface;

/// Exit code used when no configuration exists.
pub const EXIT_NO_CONFIG: i32 = 2;

/// Where configuration comes from and which environment the step inherits.
#[derive(Debug, Clone)]
pub struct CommandContext {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    host_env: HashMap<String, String>,
}

impl CommandContext {
    /// Context for `project_root`, inheriting the process environment.
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: None,
            host_env: std::env::vars().collect(),
        }
    }

    /// Load exactly this config file instead of the merged layers.
    pub fn with_config(mut self, path: Option<PathBuf>) -> Self {
        self.config_override = path;
        self
    }

    /// Replace the inherited environment.
    pub fn with_host_env(mut self, env: HashMap<String, String>) -> Self {
        self.host_env = env;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The environment a build step inherits.
    pub fn host_env(&self) -> &HashMap<String, String> {
        &self.host_env
    }

    /// Load and validate the configuration.
    ///
    /// Returns `Ok(None)` after reporting on `ui` when no configuration
    /// file exists.
    pub fn load_config(&self, ui: &mut dyn UserInterface) -> Result<Option<SonarConfig>> {
        let config = match load_config(&self.project_root, self.config_override.as_deref()) {
            Ok(config) => config,
            Err(SonarEnvError::ConfigNotFound { path }) => {
                ui.error(&format!(
                    "No configuration found at {}. Create .sonar-env/config.yml or pass --config.",
                    path.display()
                ));
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        validate(&config)?;
        Ok(Some(config))
    }
}

/// Pick the installation a command works on.
///
/// An explicit name is returned as is, even when unknown, so the build
/// wrapper reports it. Without one, the sole configured installation is
/// used; anything else is reported on `ui` and yields `None`.
pub fn select_installation(
    config: &SonarConfig,
    requested: Option<&str>,
    ui: &mut dyn UserInterface,
) -> Option<String> {
    if let Some(name) = requested {
        return Some(name.to_string());
    }

    if let Some(installation) = config.sole_installation() {
        tracing::debug!(installation = %installation.name, "using the only installation");
        return Some(installation.name);
    }

    if config.installations.is_empty() {
        ui.error("No SonarQube installations are configured.");
    } else {
        let names: Vec<_> = config.installations.keys().map(String::as_str).collect();
        ui.error(&format!(
            "Several SonarQube installations are configured ({}); choose one with --installation.",
            names.join(", ")
        ));
    }
    None
}
