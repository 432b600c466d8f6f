//! Database schema definitions and the destructive upgrade policy.
//!
//! The database is treated as a disposable local store: when the stored
//! `user_version` differs from [`CURRENT_SCHEMA_VERSION`], both tables are
//! dropped and recreated. **Any existing lists and items are lost.**

use crate::model::{CANONICAL_DATE_FORMAT, DueDate};
use chrono::NaiveDate;
use rusqlite::{Connection, Result, params};
use tracing::{debug, warn};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

pub const TABLE_LISTS: &str = "task_lists";
pub const TABLE_ITEMS: &str = "task_items";

/// The complete SQL schema.
pub const SCHEMA_SQL: &str = r"
    -- Task lists
    CREATE TABLE IF NOT EXISTS task_lists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    -- Task items
    -- due_date holds a zero-padded YYYY-MM-DD string so MIN() is chronological.
    CREATE TABLE IF NOT EXISTS task_items (
        item_id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        due_date TEXT,
        status INTEGER DEFAULT 0,
        list_id INTEGER,
        FOREIGN KEY (list_id) REFERENCES task_lists(id)
    );
    CREATE INDEX IF NOT EXISTS idx_task_items_list ON task_items(list_id);
    CREATE INDEX IF NOT EXISTS idx_task_items_due ON task_items(list_id, due_date)
        WHERE due_date IS NOT NULL;
";

/// Create both tables. Idempotent.
///
/// # Errors
///
/// Returns an error if the DDL fails.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// Drop both tables and recreate them, stamping `new_version`.
///
/// This deletes every list and item. Items are dropped first because they
/// reference lists. The drops, the DDL and the version stamp commit together.
///
/// # Errors
///
/// Returns an error if the DDL fails; the database is then left unchanged.
pub fn upgrade(conn: &Connection, old_version: i32, new_version: i32) -> Result<()> {
    warn!(
        old_version,
        new_version, "Schema version changed; dropping all task lists and items"
    );
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "DROP TABLE IF EXISTS task_items;
         DROP TABLE IF EXISTS task_lists;",
    )?;
    create_tables(&tx)?;
    tx.pragma_update(None, "user_version", new_version)?;
    tx.commit()
}

/// Rewrite stored due dates that are not canonical `YYYY-MM-DD`.
///
/// Older databases at the same schema version may hold `DD/MM/YYYY` values;
/// those are converted. Values that parse as neither format become NULL.
/// Returns the number of rows rewritten.
///
/// # Errors
///
/// Returns an error if the query or an update fails.
pub fn normalize_due_dates(conn: &Connection) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let stale: Vec<(i64, String)> = {
        let mut stmt =
            tx.prepare("SELECT item_id, due_date FROM task_items WHERE due_date IS NOT NULL")?;
        stmt.query_map([], |row| Ok((row.get(0)?, row.get::<_, String>(1)?)))?
            .filter(|row| !matches!(row, Ok((_, raw)) if is_canonical_date(raw)))
            .collect::<Result<_>>()?
    };

    for (item_id, raw) in &stale {
        let due = raw.parse::<DueDate>().ok();
        tx.execute(
            "UPDATE task_items SET due_date = ? WHERE item_id = ?",
            params![due, item_id],
        )?;
    }
    tx.commit()?;

    if !stale.is_empty() {
        warn!(rows = stale.len(), "Normalized stored due dates");
    }
    Ok(stale.len())
}

fn is_canonical_date(raw: &str) -> bool {
    NaiveDate::parse_from_str(raw, CANONICAL_DATE_FORMAT)
        .is_ok_and(|date| date.format(CANONICAL_DATE_FORMAT).to_string() == raw)
}

/// Bring the database to [`CURRENT_SCHEMA_VERSION`].
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    let stored = stored_version(conn)?;

    match stored {
        0 => {
            debug!("Initializing schema");
            create_tables(conn)?;
        }
        v if v == CURRENT_SCHEMA_VERSION => {
            debug!(version = v, "Schema up to date");
            normalize_due_dates(conn)?;
        }
        v => upgrade(conn, v, CURRENT_SCHEMA_VERSION)?,
    }

    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;

    Ok(())
}

/// Read `PRAGMA user_version`.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read.
pub fn stored_version(conn: &Connection) -> Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Column names of `table`, in declaration order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?) ORDER BY cid")?;
    stmt.query_map([table], |row| row.get(0))?
        .collect()
}
