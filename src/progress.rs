//! Progress reporting for log parsing.
//!
//! The parser reports a fraction after every chunk; this module turns it
//! into a single self-overwriting `Parsing: NN%` line on stderr.

use std::io::{self, Write};

/// Progress reporter that writes to stderr.
///
/// Only redraws when the whole percentage changes, so a multi-gigabyte log
/// read in small chunks does not flood the terminal.
pub struct ParseProgressReporter {
    /// Whether to show output (disabled for `--quiet`)
    show_output: bool,
    /// Last percentage drawn
    last_percent: Option<u8>,
}

impl ParseProgressReporter {
    /// Create a new progress reporter.
    pub fn new() -> Self {
        Self {
            show_output: true,
            last_percent: None,
        }
    }

    /// Create a progress reporter with output disabled.
    pub fn quiet() -> Self {
        Self {
            show_output: false,
            last_percent: None,
        }
    }

    /// Record a new progress fraction in `[0, 1]`.
    pub fn update(&mut self, fraction: f64) {
        let percent = to_percent(fraction);
        if self.last_percent.is_some_and(|last| last >= percent) {
            return;
        }
        self.last_percent = Some(percent);

        if self.show_output {
            eprint!("\r  Parsing: {:>3}%", percent);
            let _ = io::stderr().flush();
        }
    }

    /// Clear the progress line.
    pub fn finish(&self) {
        if self.show_output && self.last_percent.is_some() {
            eprint!("\r                    \r");
            let _ = io::stderr().flush();
        }
    }

    /// Last percentage recorded.
    pub fn percent(&self) -> Option<u8> {
        self.last_percent
    }
}

impl Default for ParseProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole percentage for a fraction, clamped to `0..=100`.
fn to_percent(fraction: f64) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).floor() as u8
}
