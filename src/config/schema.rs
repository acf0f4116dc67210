//! Configuration schema definitions for sonar-env.
//!
//! This module contains all the struct definitions that map to
//! the YAML configuration file format.
//!
//! ```yaml
//! settings:
//!   build_wrapper_enabled: true
//!   secret_env: [GITHUB_TOKEN]
//! installations:
//!   local:
//!     server_url: http://localhost:9001
//!     login: $SONAR_CONFIG_NAME
//!     password: password
//!     additional_properties: "key=value"
//!     additional_args: "-X"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Database password masked when an installation leaves it unset.
pub const DEFAULT_DATABASE_PASSWORD: &str = "sonar";

/// Root configuration structure for `.sonar-env/config.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SonarConfig {
    /// Global settings
    pub settings: Settings,

    /// Installations keyed by their unique name
    pub installations: BTreeMap<String, SonarInstallation>,
}

impl SonarConfig {
    /// Copy each map key into its installation's `name` field.
    pub fn normalize(mut self) -> Self {
        for (name, installation) in &mut self.installations {
            installation.name.clone_from(name);
        }
        self
    }

    /// Look up an installation by name.
    pub fn installation(&self, name: &str) -> Option<SonarInstallation> {
        self.installations.get(name).map(|installation| SonarInstallation {
            name: name.to_string(),
            ..installation.clone()
        })
    }

    /// All installations, with names filled in, in name order.
    pub fn installations(&self) -> Vec<SonarInstallation> {
        self.installations
            .keys()
            .filter_map(|name| self.installation(name))
            .collect()
    }

    /// The installation used when none is named explicitly.
    ///
    /// Only defined when exactly one installation is configured.
    pub fn sole_installation(&self) -> Option<SonarInstallation> {
        if self.installations.len() == 1 {
            self.installations().into_iter().next()
        } else {
            None
        }
    }
}

/// Global settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether the build wrapper may be applied to build steps
    #[serde(default = "default_true")]
    pub build_wrapper_enabled: bool,

    /// Host environment variables whose values are masked in step output
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secret_env: Vec<String>,

    /// Also mask host variables whose names look like secrets
    #[serde(default, skip_serializing_if = "is_false")]
    pub mask_host_secrets: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            build_wrapper_enabled: true,
            secret_env: Vec::new(),
            mask_host_secrets: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One named SonarQube scanner setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonarInstallation {
    /// Unique name; taken from the `installations` map key
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// SonarQube server URL
    pub server_url: String,

    /// Analysis login (may reference variables, e.g. `$SONAR_CONFIG_NAME`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,

    /// Analysis password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// JDBC URL of the SonarQube database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// JDBC username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_login: Option<String>,

    /// JDBC password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_password: Option<String>,

    /// Version of the sonar-maven-plugin to pin the goal to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mojo_version: Option<String>,

    /// Whitespace-separated `key=value` analysis properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<String>,

    /// Raw arguments appended after the `-D` properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_args: Option<String>,

    /// Trigger settings, carried through untouched
    pub triggers: TriggersConfig,
}

impl SonarInstallation {
    /// Create an installation with only a name and server URL set.
    pub fn new(name: impl Into<String>, server_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server_url: server_url.into(),
            ..Default::default()
        }
    }

    /// The configured mojo version, treating blank as unset.
    pub fn mojo_version(&self) -> Option<&str> {
        self.mojo_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Database password used for masking, falling back to the default.
    pub fn database_password_or_default(&self) -> &str {
        self.database_password
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_DATABASE_PASSWORD)
    }
}

/// Conditions under which analysis is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggersConfig {
    /// Skip when the build was triggered by an SCM change
    #[serde(skip_serializing_if = "is_false")]
    pub skip_scm_cause: bool,

    /// Skip when the build was triggered by an upstream build
    #[serde(skip_serializing_if = "is_false")]
    pub skip_upstream_cause: bool,

    /// Skip when this environment variable is set to `true`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_var: Option<String>,
}
