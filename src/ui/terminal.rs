//! Terminal listener.
//!
//! Primary output (`message`) goes to stdout so it can be piped or
//! `eval`ed; every status line goes to stderr next to the build log.

use console::Term;
use std::io::Write;

use super::{should_use_colors, OutputMode, SonarTheme, UserInterface};

/// Terminal UI implementation.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: SonarTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a terminal UI, coloring output when stderr is a TTY.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            SonarTheme::new()
        } else {
            SonarTheme::plain()
        };

        Self::with_theme(mode, theme)
    }

    /// Create a terminal UI with an explicit theme.
    pub fn with_theme(mode: OutputMode, theme: SonarTheme) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", msg).ok();
        }
    }

    fn info(&mut self, msg: &str) {
        if self.mode.shows_info() {
            writeln!(self.err, "{}", self.theme.format_info(msg)).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn fatal_error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(&format!("FATAL: {}", msg))).ok();
    }
}

/// Create the terminal UI for the given mode.
pub fn create_ui(mode: OutputMode, no_color: bool) -> Box<dyn UserInterface> {
    if no_color {
        Box::new(TerminalUI::with_theme(mode, SonarTheme::plain()))
    } else {
        Box::new(TerminalUI::new(mode))
    }
}
