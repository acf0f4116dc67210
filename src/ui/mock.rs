//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use sonar_env::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.info("Injecting SonarQube environment variables");
//! ui.fatal_error("installation does not match");
//!
//! assert!(ui.infos()[0].contains("Injecting"));
//! assert_eq!(ui.fatal_errors().len(), 1);
//! ```

use super::{OutputMode, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    infos: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    fatal_errors: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Captured primary output.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Captured informational lines.
    pub fn infos(&self) -> &[String] {
        &self.infos
    }

    /// Captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Captured warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Captured errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Captured fatal errors.
    pub fn fatal_errors(&self) -> &[String] {
        &self.fatal_errors
    }

    /// True when nothing at all was reported.
    pub fn is_untouched(&self) -> bool {
        self.messages.is_empty()
            && self.infos.is_empty()
            && self.successes.is_empty()
            && self.warnings.is_empty()
            && self.errors.is_empty()
            && self.fatal_errors.is_empty()
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn info(&mut self, msg: &str) {
        self.infos.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn fatal_error(&mut self, msg: &str) {
        self.fatal_errors.push(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_each_channel_separately() {
        let mut ui = MockUI::new();
        ui.message("out");
        ui.info("info");
        ui.success("ok");
        ui.warning("warn");
        ui.error("err");

        assert_eq!(ui.messages(), ["out"]);
        assert_eq!(ui.infos(), ["info"]);
        assert_eq!(ui.successes(), ["ok"]);
        assert_eq!(ui.warnings(), ["warn"]);
        assert_eq!(ui.errors(), ["err"]);
        assert!(ui.fatal_errors().is_empty());
        assert!(!ui.is_untouched());
    }

    #[test]
    fn new_mock_is_untouched() {
        assert!(MockUI::new().is_untouched());
    }

    #[test]
    fn output_mode_can_be_changed() {
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
        ui.set_output_mode(OutputMode::Verbose);
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }
}
