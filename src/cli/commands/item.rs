//! Item command implementation.
//!
//! Provides item management: add, ls, done, undone, edit, mv, and rm.

use crate::cli::{ItemAddArgs, ItemCommands, ItemEditArgs, ItemMoveArgs};
use crate::error::{Result, TodoError};
use crate::format::{OutputContext, format_counters, format_item_line};
use crate::model::{DueDate, ItemStatus, TaskItem};
use crate::storage::SqliteStore;
use serde::Serialize;
use tracing::{debug, info};

/// Execute the item command.
///
/// # Errors
///
/// Returns an error if database operations fail or if inputs are invalid.
pub fn execute(command: &ItemCommands, store: &mut SqliteStore, ctx: &OutputContext) -> Result<()> {
    match command {
        ItemCommands::Add(args) => item_add(args, store, ctx),
        ItemCommands::Ls(args) => item_list(args.list_id, store, ctx),
        ItemCommands::Done(args) => item_set_status(args.id, ItemStatus::Complete, store, ctx),
        ItemCommands::Undone(args) => item_set_status(args.id, ItemStatus::Incomplete, store, ctx),
        ItemCommands::Edit(args) => item_edit(args, store, ctx),
        ItemCommands::Mv(args) => item_move(args, store, ctx),
        ItemCommands::Rm(args) => item_remove(args.id, store, ctx),
    }
}

/// JSON output for `item ls`.
#[derive(Serialize)]
struct ItemListing {
    list_id: i64,
    total: usize,
    completed: usize,
    items: Vec<TaskItem>,
}

/// JSON output for rm.
#[derive(Serialize)]
struct RemoveResult {
    id: i64,
    list_id: i64,
    deleted: bool,
}

fn item_add(args: &ItemAddArgs, store: &mut SqliteStore, ctx: &OutputContext) -> Result<()> {
    let due = match &args.due {
        Some(raw) => DueDate::parse_input(raw)?,
        None => None,
    };
    let id = store.create_item(args.list_id, &args.description, due)?;
    let item = fetch_item(store, id)?;
    info!(id, list_id = item.list_id, "Item added");

    if ctx.is_json() {
        return ctx.json_pretty(&item);
    }
    ctx.text(&format!("Added {}", format_item_line(&item)));
    Ok(())
}

fn item_list(list_id: i64, store: &SqliteStore, ctx: &OutputContext) -> Result<()> {
    if !store.list_exists(list_id)? {
        return Err(TodoError::ListNotFound { id: list_id });
    }
    let items = store.list_items(list_id)?;

    if ctx.is_json() {
        let completed = items.iter().filter(|item| item.is_complete()).count();
        return ctx.json_pretty(&ItemListing {
            list_id,
            total: items.len(),
            completed,
            items,
        });
    }

    if items.is_empty() {
        ctx.text("No items in this list.");
    }
    for item in &items {
        ctx.text(&format_item_line(item));
    }
    ctx.text(&format_counters(&items));
    Ok(())
}

fn item_set_status(
    id: i64,
    status: ItemStatus,
    store: &mut SqliteStore,
    ctx: &OutputContext,
) -> Result<()> {
    if !store.set_item_status(id, status)? {
        return Err(TodoError::ItemNotFound { id });
    }
    let item = fetch_item(store, id)?;
    debug!(id, ?status, "Item status set");

    if ctx.is_json() {
        return ctx.json_pretty(&item);
    }
    ctx.text(&format_item_line(&item));
    Ok(())
}

fn item_edit(args: &ItemEditArgs, store: &mut SqliteStore, ctx: &OutputContext) -> Result<()> {
    let existing = fetch_item(store, args.id)?;
    let due = if args.clear_due {
        None
    } else {
        match &args.due {
            Some(raw) => DueDate::parse_input(raw)?,
            None => existing.due_date,
        }
    };

    if !store.edit_item(args.id, &args.description, due)? {
        return Err(TodoError::ItemNotFound { id: args.id });
    }
    let item = fetch_item(store, args.id)?;

    if ctx.is_json() {
        return ctx.json_pretty(&item);
    }
    ctx.text(&format!("Updated {}", format_item_line(&item)));
    Ok(())
}

fn item_move(args: &ItemMoveArgs, store: &mut SqliteStore, ctx: &OutputContext) -> Result<()> {
    let moved = store.move_item(args.id, args.target_list_id)?;
    if moved == 0 {
        return Err(TodoError::ItemNotFound { id: args.id });
    }
    let item = fetch_item(store, args.id)?;

    if ctx.is_json() {
        return ctx.json_pretty(&item);
    }
    ctx.text(&format!(
        "Moved {} to list #{}",
        format_item_line(&item),
        item.list_id
    ));
    Ok(())
}

fn item_remove(id: i64, store: &mut SqliteStore, ctx: &OutputContext) -> Result<()> {
    let item = fetch_item(store, id)?;
    if !store.delete_item(id)? {
        return Err(TodoError::ItemNotFound { id });
    }

    if ctx.is_json() {
        return ctx.json_pretty(&RemoveResult {
            id,
            list_id: item.list_id,
            deleted: true,
        });
    }
    ctx.text(&format!("Deleted item #{id}"));
    Ok(())
}

fn fetch_item(store: &SqliteStore, id: i64) -> Result<TaskItem> {
    store.get_item(id)?.ok_or(TodoError::ItemNotFound { id })
}
