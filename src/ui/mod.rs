//! Build listener abstraction.
//!
//! This module provides:
//! - [`UserInterface`], the listener a build step reports through
//! - [`TerminalUI`] for real runs
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use sonar_env::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.info("Injecting SonarQube environment variables using the configuration: local");
//! assert_eq!(ui.infos().len(), 1);
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, SonarTheme};

/// Trait for reporting a build step's progress.
///
/// This trait allows mocking the listener in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode.
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Write primary command output.
    fn message(&mut self, msg: &str);

    /// Report an informational status line.
    fn info(&mut self, msg: &str);

    /// Report a success.
    fn success(&mut self, msg: &str);

    /// Report a warning.
    fn warning(&mut self, msg: &str);

    /// Report an error.
    fn error(&mut self, msg: &str);

    /// Report an error that aborts the build step.
    fn fatal_error(&mut self, msg: &str) {
        self.error(&format!("FATAL: {}", msg));
    }
}
