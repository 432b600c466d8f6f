//! Diagnostic logging for the `todo` binary.
//!
//! Logs go to stderr so stdout stays clean for plain or JSON output. By
//! default only warnings from this crate are shown (for example the
//! destructive schema upgrade). Each `-v` raises the level:
//!
//! | flags   | filter                                |
//! |---------|---------------------------------------|
//! | none    | `todo_lists=warn`                     |
//! | `-v`    | `todo_lists=debug`                    |
//! | `-vv`   | `todo_lists=debug,rusqlite=debug`     |
//! | `-vvv`  | `todo_lists=trace`                    |
//! | `-q`    | `error`                               |
//!
//! `RUST_LOG` overrides all of the above. `--log-file` (or `TODO_LOG_FILE`)
//! adds a JSON copy of every event.

use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::{Mutex, Once};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber for a CLI run.
///
/// # Errors
///
/// Returns an error if the filter is invalid, the log file cannot be
/// created, or a global subscriber is already installed.
pub fn init_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter(verbosity, quiet))?,
    };

    // Source locations only help when chasing store internals.
    let detailed = verbosity > 1;
    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(detailed)
        .with_file(cfg!(debug_assertions) && detailed)
        .with_line_number(cfg!(debug_assertions) && detailed)
        .with_ansi(std::io::stderr().is_terminal());

    let json_file = log_file
        .map(|path| {
            File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))
                .map(|file| {
                    fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file))
                })
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(json_file)
        .try_init()?;

    Ok(())
}

fn default_filter(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "todo_lists=warn",
        1 => "todo_lists=debug",
        2 => "todo_lists=debug,rusqlite=debug",
        _ => "todo_lists=trace",
    }
}

/// Route `todo_lists=debug` events to the test harness's captured output.
pub fn init_test_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("todo_lists=debug")
            .with_test_writer()
            .try_init();
    });
}
