//! Schema command implementation.
//!
//! Emits JSON Schema documents describing the machine-readable outputs, or
//! with `--tables` the column layout of the database tables.

use crate::cli::{SchemaArgs, SchemaTarget};
use crate::error::Result;
use crate::format::OutputContext;
use crate::model::{ListSummary, TaskItem, TaskList};
use crate::storage::SqliteStore;
use crate::storage::schema::{TABLE_ITEMS, TABLE_LISTS};
use chrono::{DateTime, Utc};
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize, schemars::JsonSchema)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
struct ErrorBody {
    /// Machine-readable error code (SCREAMING_SNAKE_CASE)
    code: String,
    /// Human-readable message
    message: String,
    /// Optional hint for remediation
    hint: Option<String>,
}

#[derive(Debug, Serialize)]
struct SchemaOutput {
    tool: &'static str,
    generated_at: DateTime<Utc>,
    schemas: BTreeMap<&'static str, RootSchema>,
}

#[derive(Debug, Serialize)]
struct TablesOutput {
    schema_version: i32,
    tables: BTreeMap<&'static str, Vec<String>>,
}

/// Execute the schema command.
///
/// `store` is only needed for `--tables`.
///
/// # Errors
///
/// Returns an error if table introspection or serialization fails.
pub fn execute(args: &SchemaArgs, store: Option<&SqliteStore>, ctx: &OutputContext) -> Result<()> {
    if ctx.is_quiet() {
        return Ok(());
    }

    if let (true, Some(store)) = (args.tables, store) {
        return print_tables(store, ctx);
    }

    // Always JSON; don't require callers to pass --json.
    ctx.json_pretty(&SchemaOutput {
        tool: "todo",
        generated_at: Utc::now(),
        schemas: build_schemas(args.target),
    })
}

fn print_tables(store: &SqliteStore, ctx: &OutputContext) -> Result<()> {
    let mut tables = BTreeMap::new();
    for table in [TABLE_LISTS, TABLE_ITEMS] {
        tables.insert(table, store.table_columns(table)?);
    }
    let output = TablesOutput {
        schema_version: store.schema_version()?,
        tables,
    };

    if ctx.is_json() {
        return ctx.json_pretty(&output);
    }
    ctx.text(&format!("schema version {}", output.schema_version));
    for (table, columns) in &output.tables {
        ctx.text(&format!("{table}: {}", columns.join(", ")));
    }
    Ok(())
}

fn build_schemas(target: SchemaTarget) -> BTreeMap<&'static str, RootSchema> {
    let mut schemas = BTreeMap::new();

    match target {
        SchemaTarget::All => {
            schemas.insert("TaskList", schema_for!(TaskList));
            schemas.insert("TaskItem", schema_for!(TaskItem));
            schemas.insert("ListSummary", schema_for!(ListSummary));
            schemas.insert("ErrorEnvelope", schema_for!(ErrorEnvelope));
        }
        SchemaTarget::TaskList => {
            schemas.insert("TaskList", schema_for!(TaskList));
        }
        SchemaTarget::TaskItem => {
            schemas.insert("TaskItem", schema_for!(TaskItem));
        }
        SchemaTarget::ListSummary => {
            schemas.insert("ListSummary", schema_for!(ListSummary));
        }
        SchemaTarget::Error => {
            schemas.insert("ErrorEnvelope", schema_for!(ErrorEnvelope));
        }
    }

    schemas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_generation_is_json_serializable() {
        let schemas = build_schemas(SchemaTarget::All);
        assert_eq!(schemas.len(), 4);
        for (name, schema) in schemas {
            let value = serde_json::to_value(&schema).expect("schema serializable");
            assert!(value.is_object(), "{name} schema should be a JSON object");
        }
    }

    #[test]
    fn task_item_schema_lists_fields() {
        let schemas = build_schemas(SchemaTarget::TaskItem);
        let value = serde_json::to_value(&schemas["TaskItem"]).expect("serializable");
        let properties = value["properties"].as_object().expect("properties");
        for field in ["id", "description", "due_date", "status", "list_id"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
    }
}
