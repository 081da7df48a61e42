//! Charm-style inline output using cliclack
//!
//! This module is optional and only available when the `tui` feature is enabled.

use crate::report::Reporter;

/// Reports pipeline progress as cliclack log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct ClackReporter;

impl ClackReporter {
    /// Open the session with a title banner
    pub fn intro(title: &str) {
        let _ = cliclack::intro(title);
    }

    /// Close the session with a final message
    pub fn outro(message: &str) {
        let _ = cliclack::outro(message);
    }

    /// Close the session after a failure
    pub fn outro_cancel(message: &str) {
        let _ = cliclack::outro_cancel(message);
    }
}

impl Reporter for ClackReporter {
    fn step(&self, message: &str) {
        let _ = cliclack::log::step(message);
    }

    fn info(&self, message: &str) {
        let _ = cliclack::log::info(message);
    }

    fn warn(&self, message: &str) {
        let _ = cliclack::log::warning(message);
    }

    fn success(&self, message: &str) {
        let _ = cliclack::log::success(message);
    }
}
