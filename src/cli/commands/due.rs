//! Due command implementation.
//!
//! Shows a list's nearest due date and how urgent it is.

use crate::cli::DueArgs;
use crate::config::Settings;
use crate::error::{Result, TodoError};
use crate::format::{OutputContext, due_marker};
use crate::model::{DueDate, DueState};
use crate::storage::SqliteStore;
use serde::Serialize;

#[derive(Serialize)]
struct DueResult {
    list_id: i64,
    nearest_due: Option<DueDate>,
    due_state: DueState,
}

/// Execute the due command.
///
/// # Errors
///
/// Returns an error if the list does not exist or the query fails.
pub fn execute(
    args: &DueArgs,
    store: &SqliteStore,
    settings: &Settings,
    ctx: &OutputContext,
) -> Result<()> {
    if !store.list_exists(args.list_id)? {
        return Err(TodoError::ListNotFound { id: args.list_id });
    }
    let nearest_due = store.nearest_due_date(args.list_id)?;
    let due_state = DueState::classify(nearest_due, settings.today);

    if ctx.is_json() {
        return ctx.json_pretty(&DueResult {
            list_id: args.list_id,
            nearest_due,
            due_state,
        });
    }

    match nearest_due {
        Some(due) => {
            let marker = due_marker(due_state);
            if marker.is_empty() {
                ctx.text(&due.to_string());
            } else {
                ctx.text(&format!("{due}  {marker}"));
            }
        }
        None => ctx.text("No due dates."),
    }
    Ok(())
}
