//! Command-line interface.
//!
//! Each subcommand maps onto one or two [`SqliteStore`] calls. The store is
//! opened once per invocation and handed to the command by reference.

pub mod commands;

use crate::config::{CliOverrides, Settings, open_store};
use crate::error::Result;
use crate::format::OutputContext;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Offline task lists with due dates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (defaults to ~/.todo/tasks.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress normal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write JSON logs to this file
    #[arg(long, global = true, env = "TODO_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today when classifying due dates
    #[arg(long, global = true)]
    pub today: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            db: self.db.clone(),
            json: self.json.then_some(true),
            today: self.today.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage task lists
    #[command(subcommand)]
    List(ListCommands),

    /// Manage items within a list
    #[command(subcommand)]
    Item(ItemCommands),

    /// Show the nearest due date of a list
    Due(DueArgs),

    /// Print JSON Schemas for output types, or the database table layout
    Schema(SchemaArgs),

    /// Drop and recreate the database tables (deletes everything)
    Reset(ResetArgs),
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Create a new list
    Create(ListCreateArgs),
    /// Rename a list
    Rename(ListRenameArgs),
    /// Show all lists with counters and nearest due date
    Show,
    /// Delete a list and its items
    Delete(ListDeleteArgs),
    /// Print list names and ids (move targets)
    Names,
}

#[derive(Args, Debug)]
pub struct ListCreateArgs {
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ListRenameArgs {
    pub id: i64,
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ListDeleteArgs {
    pub id: i64,
}

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add an item to a list
    Add(ItemAddArgs),
    /// List the items of a list
    Ls(ItemListArgs),
    /// Mark an item complete
    Done(ItemIdArgs),
    /// Mark an item incomplete
    Undone(ItemIdArgs),
    /// Change an item's description and due date
    Edit(ItemEditArgs),
    /// Move an item to another list
    Mv(ItemMoveArgs),
    /// Delete an item
    Rm(ItemIdArgs),
}

#[derive(Args, Debug)]
pub struct ItemAddArgs {
    pub list_id: i64,
    pub description: String,
    /// Due date, YYYY-MM-DD or DD/MM/YYYY
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args, Debug)]
pub struct ItemListArgs {
    pub list_id: i64,
}

#[derive(Args, Debug)]
pub struct ItemIdArgs {
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct ItemEditArgs {
    pub id: i64,
    pub description: String,
    /// New due date, YYYY-MM-DD or DD/MM/YYYY
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}

#[derive(Args, Debug)]
pub struct ItemMoveArgs {
    pub id: i64,
    pub target_list_id: i64,
}

#[derive(Args, Debug)]
pub struct DueArgs {
    pub list_id: i64,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Which schema to print
    #[arg(value_enum, default_value_t = SchemaTarget::All)]
    pub target: SchemaTarget,
    /// Print database table columns instead of JSON Schemas
    #[arg(long)]
    pub tables: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaTarget {
    All,
    TaskList,
    TaskItem,
    ListSummary,
    Error,
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Confirm that all lists and items should be deleted
    #[arg(long)]
    pub yes: bool,
}

/// Dispatch a parsed command.
///
/// # Errors
///
/// Returns the first error raised by the store or by input validation.
pub fn run(cli: &Cli, settings: &Settings, ctx: &OutputContext) -> Result<()> {
    if let Commands::Schema(args) = &cli.command {
        if !args.tables {
            return commands::schema::execute(args, None, ctx);
        }
    }

    let mut store = open_store(settings)?;

    match &cli.command {
        Commands::List(command) => commands::list::execute(command, &mut store, settings, ctx),
        Commands::Item(command) => commands::item::execute(command, &mut store, ctx),
        Commands::Due(args) => commands::due::execute(args, &store, settings, ctx),
        Commands::Schema(args) => commands::schema::execute(args, Some(&store), ctx),
        Commands::Reset(args) => commands::reset::execute(args, &mut store, ctx),
    }?;

    let changed = store.drain_changes();
    if !changed.is_empty() {
        debug!(lists = ?changed, "Lists changed");
    }

    Ok(())
}
