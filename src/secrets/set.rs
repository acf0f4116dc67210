//! The set of secret values masked in a build step's output.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::config::SonarInstallation;

use super::pattern::SecretMatcher;

/// Non-empty secret strings, in a stable order.
///
/// The `Debug` output only reports how many secrets are held so the values
/// never end up in logs.
///
/// # Example
///
/// ```
/// use sonar_env::secrets::SecretSet;
///
/// let mut secrets = SecretSet::new();
/// secrets.insert("password");
/// secrets.insert("");
///
/// assert_eq!(secrets.len(), 1);
/// assert_eq!(format!("{:?}", secrets), "SecretSet { count: 1 }");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretSet {
    secrets: BTreeSet<String>,
}

impl SecretSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Secrets of one installation: its password and its database password.
    ///
    /// An unset database password contributes the generic default, since
    /// that is what the scanner falls back to.
    pub fn for_installation(installation: &SonarInstallation) -> Self {
        let mut set = Self::new();
        if let Some(password) = &installation.password {
            set.insert(password.as_str());
        }
        set.insert(installation.database_password_or_default());
        set
    }

    /// Values of host variables the matcher classifies as secret.
    pub fn from_host_env(env: &HashMap<String, String>, matcher: &SecretMatcher) -> Self {
        env.iter()
            .filter(|(name, _)| matcher.is_secret(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Add a secret. Empty strings are ignored.
    pub fn insert(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.secrets.insert(value);
        }
    }

    /// Add every secret of `other`.
    pub fn merge(&mut self, other: SecretSet) {
        self.secrets.extend(other.secrets);
    }

    /// Check whether `value` is held.
    pub fn contains(&self, value: &str) -> bool {
        self.secrets.contains(value)
    }

    /// Number of secrets.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// True when there is nothing to mask.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// Iterate over the secrets in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.secrets.iter().map(String::as_str)
    }
}

impl fmt::Debug for SecretSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretSet")
            .field("count", &self.secrets.len())
            .finish()
    }
}

impl<S: Into<String>> FromIterator<S> for SecretSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<S: Into<String>> Extend<S> for SecretSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}
