//! Secret name patterns.
//!
//! Classifies host environment variable names so their values can be added
//! to the masked set alongside the installation's own credentials.

use regex::Regex;
use std::collections::BTreeSet;

/// Built-in name patterns as (name, regex) pairs.
pub const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("api_key", r"(?i)^.*_?(API_?KEY|APIKEY)$"),
    ("secret", r"(?i)^.*_?(SECRET|SECRET_KEY)$"),
    ("token", r"(?i)^.*_?(TOKEN|ACCESS_TOKEN|AUTH_TOKEN)$"),
    ("password", r"(?i)^.*(PASSWORD|PASSWD|_PWD)$"),
    ("credential", r"(?i)^.*_?CREDENTIALS?$"),
    ("private_key", r"(?i)^.*_?PRIVATE_KEY$"),
];

/// A named pattern that identifies secret variable names.
#[derive(Debug, Clone)]
pub struct SecretPattern {
    /// Name of this pattern (for debugging).
    pub name: String,
    /// Regex matched against the variable name.
    pub env_pattern: Regex,
}

/// Decides which environment variable names hold secrets.
///
/// # Example
///
/// ```
/// use sonar_env::secrets::SecretMatcher;
///
/// let matcher = SecretMatcher::with_builtins_and_custom(&["SONAR_TOKEN_FILE".to_string()]);
///
/// assert!(matcher.is_secret("GITHUB_TOKEN"));
/// assert!(matcher.is_secret("SONAR_TOKEN_FILE"));
/// assert!(!matcher.is_secret("SONAR_HOST_URL"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SecretMatcher {
    patterns: Vec<SecretPattern>,
    exact: BTreeSet<String>,
}

impl SecretMatcher {
    /// A matcher that matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A matcher with the built-in patterns.
    pub fn with_builtins() -> Self {
        let patterns = BUILTIN_PATTERNS
            .iter()
            .filter_map(|(name, pattern)| {
                Regex::new(pattern).ok().map(|env_pattern| SecretPattern {
                    name: (*name).to_string(),
                    env_pattern,
                })
            })
            .collect();

        Self {
            patterns,
            exact: BTreeSet::new(),
        }
    }

    /// A matcher with only exact names.
    pub fn with_custom(names: &[String]) -> Self {
        let mut matcher = Self::new();
        matcher.add_names(names);
        matcher
    }

    /// Built-in patterns plus exact names.
    pub fn with_builtins_and_custom(names: &[String]) -> Self {
        let mut matcher = Self::with_builtins();
        matcher.add_names(names);
        matcher
    }

    /// Add exact variable names. Blank names are skipped.
    pub fn add_names(&mut self, names: &[String]) {
        self.exact.extend(
            names
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        );
    }

    /// Add a custom pattern.
    pub fn add_pattern(&mut self, pattern: SecretPattern) {
        self.patterns.push(pattern);
    }

    /// Check if a variable name is a secret.
    pub fn is_secret(&self, env_name: &str) -> bool {
        self.exact.contains(env_name)
            || self
                .patterns
                .iter()
                .any(|p| p.env_pattern.is_match(env_name))
    }

    /// Number of patterns plus exact names.
    pub fn rule_count(&self) -> usize {
        self.patterns.len() + self.exact.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_match_common_secret_names() {
        let matcher = SecretMatcher::with_builtins();

        for name in [
            "API_KEY",
            "GITHUB_TOKEN",
            "SONAR_AUTH_TOKEN",
            "DB_PASSWORD",
            "MYSQL_PWD",
            "AWS_SECRET",
            "GCP_CREDENTIALS",
            "SSH_PRIVATE_KEY",
        ] {
            assert!(matcher.is_secret(name), "{} should be secret", name);
        }
    }

    #[test]
    fn builtins_skip_ordinary_names() {
        let matcher = SecretMatcher::with_builtins();

        for name in [
            "PATH",
            "HOME",
            "PWD",
            "OLDPWD",
            "SONAR_HOST_URL",
            "SONAR_MAVEN_GOAL",
            "CI",
        ] {
            assert!(!matcher.is_secret(name), "{} should not be secret", name);
        }
    }

    #[test]
    fn all_builtin_patterns_compile() {
        assert_eq!(
            SecretMatcher::with_builtins().rule_count(),
            BUILTIN_PATTERNS.len()
        );
    }

    #[test]
    fn custom_names_are_exact() {
        let matcher = SecretMatcher::with_custom(&["DEPLOY_KEY_PATH".to_string()]);

        assert!(matcher.is_secret("DEPLOY_KEY_PATH"));
        assert!(!matcher.is_secret("DEPLOY_KEY_PATH_2"));
        assert!(!matcher.is_secret("GITHUB_TOKEN"));
    }

    #[test]
    fn blank_custom_names_are_ignored() {
        let matcher = SecretMatcher::with_custom(&["  ".to_string(), String::new()]);
        assert_eq!(matcher.rule_count(), 0);
    }

    #[test]
    fn empty_matcher_matches_nothing() {
        let matcher = SecretMatcher::new();
        assert!(!matcher.is_secret("PASSWORD"));
    }

    #[test]
    fn added_pattern_is_used() {
        let mut matcher = SecretMatcher::new();
        matcher.add_pattern(SecretPattern {
            name: "sonar".to_string(),
            env_pattern: Regex::new("^SONAR_.*_KEY$").unwrap(),
        });

        assert!(matcher.is_secret("SONAR_SIGNING_KEY"));
        assert!(!matcher.is_secret("SONAR_HOST_URL"));
    }
}
