//! Reset command implementation.
//!
//! Runs the destructive schema re-initialization. All lists and items are lost.

use crate::cli::ResetArgs;
use crate::error::{Result, TodoError};
use crate::format::OutputContext;
use crate::storage::SqliteStore;
use serde::Serialize;
use tracing::warn;

#[derive(Serialize)]
struct ResetResult {
    lists_removed: usize,
    schema_version: i32,
}

/// Execute the reset command.
///
/// # Errors
///
/// Returns a validation error without `--yes`, or a database error.
pub fn execute(args: &ResetArgs, store: &mut SqliteStore, ctx: &OutputContext) -> Result<()> {
    if !args.yes {
        return Err(TodoError::validation(
            "yes",
            "reset deletes every list and item; pass --yes to confirm",
        ));
    }

    let lists_removed = store.count_lists()?;
    store.reset()?;
    warn!(lists_removed, "Database reset");

    let result = ResetResult {
        lists_removed,
        schema_version: store.schema_version()?,
    };
    if ctx.is_json() {
        return ctx.json_pretty(&result);
    }
    ctx.text(&format!("Reset database; removed {lists_removed} list(s)."));
    Ok(())
}
