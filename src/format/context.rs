//! Output context and mode detection.
//!
//! # Mode Selection Logic
//!
//! 1. `--quiet` flag → Quiet mode (no stdout on success)
//! 2. `--json` flag (or `json: true` in config) → JSON mode
//! 3. Otherwise → Plain text mode

use serde::Serialize;

use crate::error::{StructuredError, TodoError};

/// Output mode determining formatting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable text.
    #[default]
    Plain,

    /// JSON output for machine consumption.
    Json,

    /// Minimal output.
    Quiet,
}

impl OutputMode {
    /// Returns true if this mode produces structured data (JSON).
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Json)
    }

    /// Returns true if this mode should minimize output.
    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// Output context shared by all command handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputContext {
    mode: OutputMode,
}

impl OutputContext {
    #[must_use]
    pub const fn from_flags(json: bool, quiet: bool) -> Self {
        let mode = if quiet {
            OutputMode::Quiet
        } else if json {
            OutputMode::Json
        } else {
            OutputMode::Plain
        };
        Self { mode }
    }

    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.mode.is_structured()
    }

    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        self.mode.is_quiet()
    }

    /// Print `value` as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json_pretty<T: Serialize + ?Sized>(&self, value: &T) -> crate::Result<()> {
        let output = serde_json::to_string_pretty(value)?;
        println!("{output}");
        Ok(())
    }

    /// Print a line in plain mode; no-op otherwise.
    pub fn text(&self, line: &str) {
        if matches!(self.mode, OutputMode::Plain) {
            println!("{line}");
        }
    }

    /// Report a failed command. JSON mode writes an error envelope to stdout.
    pub fn error(&self, err: &TodoError) {
        if self.is_json() {
            let envelope = StructuredError::from_error(err).to_json();
            println!("{envelope}");
            return;
        }
        eprintln!("Error: {err}");
        if let Some(hint) = err.hint() {
            eprintln!("Hint: {hint}");
        }
    }
}
