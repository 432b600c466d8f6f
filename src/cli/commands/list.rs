//! List command implementation.
//!
//! Provides list management: create, rename, show, delete, and names.

use crate::cli::ListCommands;
use crate::config::Settings;
use crate::error::{Result, TodoError};
use crate::format::{OutputContext, format_list_line, format_summary_line, max_display_width};
use crate::storage::SqliteStore;
use serde::Serialize;
use tracing::info;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if database operations fail or if inputs are invalid.
pub fn execute(
    command: &ListCommands,
    store: &mut SqliteStore,
    settings: &Settings,
    ctx: &OutputContext,
) -> Result<()> {
    match command {
        ListCommands::Create(args) => list_create(&args.name, store, ctx),
        ListCommands::Rename(args) => list_rename(args.id, &args.name, store, ctx),
        ListCommands::Show => list_show(store, settings, ctx),
        ListCommands::Delete(args) => list_delete(args.id, store, ctx),
        ListCommands::Names => list_names(store, ctx),
    }
}

/// JSON output for delete.
#[derive(Serialize)]
struct DeleteResult {
    id: i64,
    deleted: bool,
}

/// JSON output for names: parallel arrays, same order.
#[derive(Serialize)]
struct NamesResult {
    names: Vec<String>,
    ids: Vec<i64>,
}

fn list_create(name: &str, store: &mut SqliteStore, ctx: &OutputContext) -> Result<()> {
    let id = store.create_list(name)?;
    let list = store
        .get_list(id)?
        .ok_or(TodoError::ListNotFound { id })?;
    info!(id, name = %list.name, "Task list created");

    if ctx.is_json() {
        return ctx.json_pretty(&list);
    }
    ctx.text(&format!("Created list {}", format_list_line(&list)));
    Ok(())
}

fn list_rename(id: i64, name: &str, store: &mut SqliteStore, ctx: &OutputContext) -> Result<()> {
    if !store.rename_list(id, name)? {
        return Err(TodoError::ListNotFound { id });
    }
    let list = store
        .get_list(id)?
        .ok_or(TodoError::ListNotFound { id })?;

    if ctx.is_json() {
        return ctx.json_pretty(&list);
    }
    ctx.text(&format!("Renamed list {}", format_list_line(&list)));
    Ok(())
}

fn list_show(store: &SqliteStore, settings: &Settings, ctx: &OutputContext) -> Result<()> {
    let summaries = store.list_summaries(settings.today)?;

    if ctx.is_json() {
        return ctx.json_pretty(&summaries);
    }
    if summaries.is_empty() {
        ctx.text("No lists yet. Create one with `todo list create <name>`.");
        return Ok(());
    }

    let width = max_display_width(summaries.iter().map(|s| s.list.name.as_str()));
    for summary in &summaries {
        ctx.text(&format_summary_line(summary, width));
    }
    Ok(())
}

fn list_delete(id: i64, store: &mut SqliteStore, ctx: &OutputContext) -> Result<()> {
    if !store.delete_list(id)? {
        return Err(TodoError::ListNotFound { id });
    }

    if ctx.is_json() {
        return ctx.json_pretty(&DeleteResult { id, deleted: true });
    }
    ctx.text(&format!("Deleted list #{id}"));
    Ok(())
}

fn list_names(store: &SqliteStore, ctx: &OutputContext) -> Result<()> {
    let names = store.list_all_list_names()?;
    let ids = store.list_all_list_ids()?;

    if ctx.is_json() {
        return ctx.json_pretty(&NamesResult { names, ids });
    }
    for (id, name) in ids.iter().zip(&names) {
        ctx.text(&format!("{id}\t{name}"));
    }
    Ok(())
}
