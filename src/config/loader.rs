//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from
//! various locations in the correct priority order.

use crate::config::merger::merge_configs;
use crate::config::schema::SonarConfig;
use crate::error::{Result, SonarEnvError};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project and per-user configuration directory.
pub const CONFIG_DIR: &str = ".sonar-env";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. User global config (`~/.sonar-env/config.yml`)
/// 2. Project config (`.sonar-env/config.yml`)
/// 3. Local overrides (`.sonar-env/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// User's global config: ~/.sonar-env/config.yml
    pub user_global: Option<PathBuf>,

    /// Project config: .sonar-env/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .sonar-env/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            user_global: Self::find_user_global(),
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    fn find_user_global() -> Option<PathBuf> {
        existing(dirs::home_dir()?.join(CONFIG_DIR).join("config.yml"))
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Check if any config file exists.
    pub fn has_any(&self) -> bool {
        !self.all_existing().is_empty()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Find the project root by walking up from `start`.
///
/// Looks for a `.sonar-env` directory first, then falls back to `.git`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() || current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SonarEnvError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SonarEnvError::Io(e)
        }
    })
}

/// Load a single config file and parse it into [`SonarConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<SonarConfig> {
    let content = read_config(path)?;
    parse_config(&content, path)
}

/// Parse YAML content into [`SonarConfig`].
///
/// `source_path` is only used for error reporting. An empty document
/// yields the default configuration.
pub fn parse_config(content: &str, source_path: &Path) -> Result<SonarConfig> {
    if content.trim().is_empty() {
        return Ok(SonarConfig::default());
    }

    serde_yaml::from_str::<SonarConfig>(content)
        .map(SonarConfig::normalize)
        .map_err(|e| SonarEnvError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Load a config file as a raw YAML value (for merging).
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = read_config(path)?;

    serde_yaml::from_str(&content).map_err(|e| SonarEnvError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge all config files for a project.
///
/// # Errors
///
/// Returns `ConfigNotFound` if no config file exists at all.
/// Returns `ConfigParseError` if any config file is invalid.
pub fn load_merged_config(project_root: &Path) -> Result<SonarConfig> {
    let paths = ConfigPaths::discover(project_root);
    let project_path = project_root.join(CONFIG_DIR).join("config.yml");

    if !paths.has_any() {
        return Err(SonarEnvError::ConfigNotFound { path: project_path });
    }

    let mut configs = Vec::new();
    for path in paths.all_existing() {
        tracing::debug!("Loading config layer {}", path.display());
        let value = load_config_value(path)?;
        // Empty files parse as null and must not wipe earlier layers
        if !value.is_null() {
            configs.push(value);
        }
    }

    let merged = merge_configs(&configs);

    serde_yaml::from_value::<SonarConfig>(merged)
        .map(SonarConfig::normalize)
        .map_err(|e| SonarEnvError::ConfigParseError {
            path: project_path,
            message: format!("Failed to parse merged config: {}", e),
        })
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging.
/// Otherwise, discovers and merges all config files.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<SonarConfig> {
    if let Some(override_path) = config_override {
        load_config_file(override_path)
    } else {
        load_merged_config(project_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_with(config: &str, local: Option<&str>) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), config).unwrap();
        if let Some(local) = local {
            fs::write(dir.join("config.local.yml"), local).unwrap();
        }
        temp
    }

    #[test]
    fn discover_finds_project_and_local_config() {
        let temp = project_with("", Some(""));
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.project.is_some());
        assert!(paths.project_local.is_some());
        assert!(paths.has_any());
    }

    #[test]
    fn discover_returns_none_for_missing_configs() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.project.is_none());
        assert!(paths.project_local.is_none());
    }

    #[test]
    fn all_existing_puts_local_last() {
        let temp = project_with("", Some(""));
        let paths = ConfigPaths::discover(temp.path());
        let all = paths.all_existing();
        assert!(all.len() >= 2);
        assert!(all[all.len() - 1].ends_with("config.local.yml"));
    }

    #[test]
    fn find_project_root_finds_config_dir() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("foo").join("bar");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(CONFIG_DIR)).unwrap();

        assert_eq!(find_project_root(&subdir), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_falls_back_to_git() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("src");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();

        assert_eq!(find_project_root(&subdir), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn load_config_file_returns_not_found_error() {
        let result = load_config_file(Path::new("/nonexistent/config.yml"));
        assert!(matches!(result, Err(SonarEnvError::ConfigNotFound { .. })));
    }

    #[test]
    fn parse_config_rejects_invalid_yaml() {
        let result = parse_config("installations: [", Path::new("test.yml"));
        assert!(matches!(result, Err(SonarEnvError::ConfigParseError { .. })));
    }

    #[test]
    fn parse_config_handles_empty_document() {
        let config = parse_config("", Path::new("test.yml")).unwrap();
        assert!(config.installations.is_empty());
    }

    #[test]
    fn load_config_file_fills_installation_names() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yml");
        fs::write(&path, "installations:\n  local:\n    server_url: http://localhost:9001\n")
            .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.installations["local"].name, "local");
    }

    #[test]
    fn load_merged_config_merges_project_and_local() {
        let temp = project_with(
            r#"
installations:
  local:
    server_url: http://localhost:9001
    password: committed
  other:
    server_url: http://other
"#,
            Some(
                r#"
settings:
  build_wrapper_enabled: false
installations:
  local:
    password: from-local-file
"#,
            ),
        );

        let config = load_merged_config(temp.path()).unwrap();
        let local = config.installation("local").unwrap();

        assert!(!config.settings.build_wrapper_enabled);
        assert_eq!(local.server_url, "http://localhost:9001");
        assert_eq!(local.password.as_deref(), Some("from-local-file"));
        assert!(config.installations.contains_key("other"));
    }

    #[test]
    fn load_merged_config_ignores_empty_layers() {
        let temp = project_with("installations:\n  local:\n    server_url: http://x\n", Some(""));
        let config = load_merged_config(temp.path()).unwrap();
        assert!(config.installations.contains_key("local"));
    }

    #[test]
    fn load_config_with_override_skips_merge() {
        let temp = project_with("installations:\n  merged: {}\n", None);
        let override_path = temp.path().join("custom.yml");
        fs::write(&override_path, "installations:\n  custom: {}\n").unwrap();

        let config = load_config(temp.path(), Some(&override_path)).unwrap();
        assert!(config.installations.contains_key("custom"));
        assert!(!config.installations.contains_key("merged"));
    }
}
