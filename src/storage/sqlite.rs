//! `SQLite` storage implementation.

use crate::error::{Result, TodoError};
use crate::model::{DueDate, DueState, ItemStatus, ListSummary, TaskItem, TaskList};
use crate::storage::schema::{self, CURRENT_SCHEMA_VERSION, apply_schema};
use crate::validation;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use std::path::Path;
use tracing::{debug, trace};

const ITEM_COLUMNS: &str = "item_id, description, due_date, status, list_id";

/// SQLite-backed task store.
///
/// Owns a single connection for its whole lifetime. Writes take `&mut self`
/// and run inside an immediate transaction, so duplicate checks and the
/// write they guard commit together.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    pending_changes: Vec<i64>,
}

/// Context for a mutation, tracking which lists it touched.
#[derive(Debug)]
pub struct MutationContext {
    pub op_name: &'static str,
    pub changed_lists: Vec<i64>,
}

impl MutationContext {
    #[must_use]
    pub const fn new(op_name: &'static str) -> Self {
        Self {
            op_name,
            changed_lists: Vec::new(),
        }
    }

    pub fn touch_list(&mut self, list_id: i64) {
        if !self.changed_lists.contains(&list_id) {
            self.changed_lists.push(list_id);
        }
    }
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened task store");
        Ok(Self {
            conn,
            pending_changes: Vec::new(),
        })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn,
            pending_changes: Vec::new(),
        })
    }

    /// Run `f` inside an immediate transaction.
    ///
    /// Lists recorded on the context are queued as changes once the
    /// transaction commits. On error nothing is committed or queued.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or a database error from begin/commit.
    pub fn mutate<F, R>(&mut self, op: &'static str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &mut MutationContext) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut ctx = MutationContext::new(op);

        let result = f(&tx, &mut ctx)?;

        tx.commit()?;

        for list_id in ctx.changed_lists {
            trace!(op = ctx.op_name, list_id, "List changed");
            if !self.pending_changes.contains(&list_id) {
                self.pending_changes.push(list_id);
            }
        }

        Ok(result)
    }

    /// Take the ids of lists changed since the last call, in first-change order.
    pub fn drain_changes(&mut self) -> Vec<i64> {
        std::mem::take(&mut self.pending_changes)
    }

    // ------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------

    /// Create a new task list.
    ///
    /// The name is trimmed before it is checked and stored, so `"Home "`
    /// collides with an existing `"Home"`. Past that, the comparison is exact
    /// and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for a blank name and
    /// [`TodoError::DuplicateList`] if a list with exactly this name exists.
    pub fn create_list(&mut self, name: &str) -> Result<i64> {
        let name = validation::list_name(name)?;

        let id = self.mutate("create_list", |tx, ctx| {
            if list_name_taken(tx, &name, None)? {
                return Err(TodoError::DuplicateList { name: name.clone() });
            }
            tx.execute("INSERT INTO task_lists (name) VALUES (?)", [&name])?;
            let id = tx.last_insert_rowid();
            ctx.touch_list(id);
            Ok(id)
        })?;

        debug!(id, name = %name, "Created task list");
        Ok(id)
    }

    /// Rename a list. Returns `false` if no list has this id.
    ///
    /// The new name is trimmed and checked the same way as in
    /// [`SqliteStore::create_list`].
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for a blank name and
    /// [`TodoError::DuplicateList`] if another list already uses the name.
    pub fn rename_list(&mut self, id: i64, new_name: &str) -> Result<bool> {
        let new_name = validation::list_name(new_name)?;

        self.mutate("rename_list", |tx, ctx| {
            if list_name_taken(tx, &new_name, Some(id))? {
                return Err(TodoError::DuplicateList {
                    name: new_name.clone(),
                });
            }
            let rows = tx.execute(
                "UPDATE task_lists SET name = ? WHERE id = ?",
                params![new_name, id],
            )?;
            if rows > 0 {
                ctx.touch_list(id);
            }
            Ok(rows > 0)
        })
    }

    /// Delete a list together with all of its items.
    ///
    /// Returns `false` if no list has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_list(&mut self, id: i64) -> Result<bool> {
        self.mutate("delete_list", |tx, ctx| {
            let items = tx.execute("DELETE FROM task_items WHERE list_id = ?", [id])?;
            let rows = tx.execute("DELETE FROM task_lists WHERE id = ?", [id])?;
            if rows > 0 {
                debug!(id, items, "Deleted task list");
                ctx.touch_list(id);
            }
            Ok(rows > 0)
        })
    }

    /// All lists in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_lists(&self) -> Result<Vec<TaskList>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM task_lists ORDER BY id")?;
        let lists = stmt
            .query_map([], list_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lists)
    }

    /// List names, in the same order as [`Self::list_all_list_ids`].
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_list_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM task_lists ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// List ids, in the same order as [`Self::list_all_list_names`].
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_list_ids(&self) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare("SELECT id FROM task_lists ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    /// Get a list by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_list(&self, id: i64) -> Result<Option<TaskList>> {
        let list = self
            .conn
            .query_row(
                "SELECT id, name FROM task_lists WHERE id = ?",
                [id],
                list_from_row,
            )
            .optional()?;
        Ok(list)
    }

    /// Whether a list with this id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_exists(&self, id: i64) -> Result<bool> {
        Ok(list_exists(&self.conn, id)?)
    }

    /// Number of lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_lists(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT count(*) FROM task_lists", [], |row| row.get(0))?;
        Ok(to_count(count))
    }

    /// Earliest due date among the list's items, if any item has one.
    ///
    /// Relies on the canonical `YYYY-MM-DD` representation, which
    /// [`schema::normalize_due_dates`] enforces on open: the string minimum is
    /// the chronological minimum.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn nearest_due_date(&self, list_id: i64) -> Result<Option<DueDate>> {
        let raw = self.conn.query_row(
            "SELECT MIN(due_date) FROM task_items
             WHERE list_id = ? AND due_date IS NOT NULL AND due_date != ''",
            [list_id],
            |row| row.get::<_, Option<String>>(0),
        )?;
        Ok(parse_stored_due(raw))
    }

    /// Per-list counters and due-date urgency relative to `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_summaries(&self, today: NaiveDate) -> Result<Vec<ListSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id, l.name,
                    COUNT(i.item_id),
                    COALESCE(SUM(CASE WHEN i.status = 1 THEN 1 ELSE 0 END), 0),
                    MIN(CASE WHEN i.due_date != '' THEN i.due_date END)
             FROM task_lists l
             LEFT JOIN task_items i ON i.list_id = l.id
             GROUP BY l.id, l.name
             ORDER BY l.id",
        )?;

        let summaries = stmt
            .query_map([], |row| {
                let nearest_due = parse_stored_due(row.get(4)?);
                Ok(ListSummary {
                    list: TaskList {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    },
                    total: to_count(row.get(2)?),
                    completed: to_count(row.get(3)?),
                    nearest_due,
                    due_state: DueState::classify(nearest_due, today),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(summaries)
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Add an item to a list with status incomplete.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for a blank description,
    /// [`TodoError::ListNotFound`] if the list is missing, and
    /// [`TodoError::DuplicateItem`] if the list already has an item with this
    /// description.
    pub fn create_item(
        &mut self,
        list_id: i64,
        description: &str,
        due_date: Option<DueDate>,
    ) -> Result<i64> {
        let description = validation::item_description(description)?;

        let id = self.mutate("create_item", |tx, ctx| {
            if !list_exists(tx, list_id)? {
                return Err(TodoError::ListNotFound { id: list_id });
            }
            if description_taken(tx, list_id, &description, None)? {
                return Err(TodoError::DuplicateItem {
                    list_id,
                    description: description.clone(),
                });
            }
            tx.execute(
                "INSERT INTO task_items (description, due_date, status, list_id)
                 VALUES (?, ?, 0, ?)",
                params![description, due_date, list_id],
            )?;
            let id = tx.last_insert_rowid();
            ctx.touch_list(list_id);
            Ok(id)
        })?;

        debug!(id, list_id, "Created task item");
        Ok(id)
    }

    /// Items of a list in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_items(&self, list_id: i64) -> Result<Vec<TaskItem>> {
        let sql =
            format!("SELECT {ITEM_COLUMNS} FROM task_items WHERE list_id = ? ORDER BY item_id");
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map([list_id], item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    /// Get an item by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_item(&self, item_id: i64) -> Result<Option<TaskItem>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM task_items WHERE item_id = ?");
        let item = self
            .conn
            .query_row(&sql, [item_id], item_from_row)
            .optional()?;
        Ok(item)
    }

    /// Set an item's completion status. Returns `false` if the item is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_item_status(&mut self, item_id: i64, status: ItemStatus) -> Result<bool> {
        self.mutate("set_item_status", |tx, ctx| {
            let Some(list_id) = item_list_id(tx, item_id)? else {
                return Ok(false);
            };
            let rows = tx.execute(
                "UPDATE task_items SET status = ? WHERE item_id = ?",
                params![status, item_id],
            )?;
            ctx.touch_list(list_id);
            Ok(rows > 0)
        })
    }

    /// Replace an item's description and due date.
    ///
    /// Returns `false` if the item is missing.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for a blank description and
    /// [`TodoError::DuplicateItem`] if another item in the same list already
    /// has the new description.
    pub fn edit_item(
        &mut self,
        item_id: i64,
        description: &str,
        due_date: Option<DueDate>,
    ) -> Result<bool> {
        let description = validation::item_description(description)?;

        self.mutate("edit_item", |tx, ctx| {
            let Some(list_id) = item_list_id(tx, item_id)? else {
                return Ok(false);
            };
            if description_taken(tx, list_id, &description, Some(item_id))? {
                return Err(TodoError::DuplicateItem {
                    list_id,
                    description: description.clone(),
                });
            }
            let rows = tx.execute(
                "UPDATE task_items SET description = ?, due_date = ? WHERE item_id = ?",
                params![description, due_date, item_id],
            )?;
            ctx.touch_list(list_id);
            Ok(rows > 0)
        })
    }

    /// Move an item to another list. Returns the number of rows moved.
    ///
    /// Description uniqueness is not re-checked in the target list.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::ListNotFound`] if the target list is missing.
    pub fn move_item(&mut self, item_id: i64, target_list_id: i64) -> Result<usize> {
        self.mutate("move_item", |tx, ctx| {
            if !list_exists(tx, target_list_id)? {
                return Err(TodoError::ListNotFound { id: target_list_id });
            }
            let Some(source_list_id) = item_list_id(tx, item_id)? else {
                return Ok(0);
            };
            let rows = tx.execute(
                "UPDATE task_items SET list_id = ? WHERE item_id = ?",
                params![target_list_id, item_id],
            )?;
            if rows > 0 {
                ctx.touch_list(source_list_id);
                ctx.touch_list(target_list_id);
            }
            Ok(rows)
        })
    }

    /// Delete an item. Returns `false` if the item is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_item(&mut self, item_id: i64) -> Result<bool> {
        self.mutate("delete_item", |tx, ctx| {
            let Some(list_id) = item_list_id(tx, item_id)? else {
                return Ok(false);
            };
            let rows = tx.execute("DELETE FROM task_items WHERE item_id = ?", [item_id])?;
            ctx.touch_list(list_id);
            Ok(rows > 0)
        })
    }

    // ------------------------------------------------------------------
    // Schema
    // ------------------------------------------------------------------

    /// Run the destructive upgrade to `new_version` on this connection.
    ///
    /// Every list is reported as changed. `new_version` is stamped as given;
    /// if it differs from [`CURRENT_SCHEMA_VERSION`], the next
    /// [`SqliteStore::open`] of the same file sees a mismatch and wipes the
    /// tables again.
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL fails.
    pub fn upgrade_schema(&mut self, new_version: i32) -> Result<()> {
        let old_version = schema::stored_version(&self.conn)?;
        let lost = self.list_all_list_ids()?;
        schema::upgrade(&self.conn, old_version, new_version)?;
        for id in lost {
            if !self.pending_changes.contains(&id) {
                self.pending_changes.push(id);
            }
        }
        Ok(())
    }

    /// Drop and recreate both tables at the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL fails.
    pub fn reset(&mut self) -> Result<()> {
        self.upgrade_schema(CURRENT_SCHEMA_VERSION)
    }

    /// Stored schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma cannot be read.
    pub fn schema_version(&self) -> Result<i32> {
        Ok(schema::stored_version(&self.conn)?)
    }

    /// Column names of one of the store's tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        Ok(schema::table_columns(&self.conn, table)?)
    }
}

fn list_from_row(row: &rusqlite::Row) -> rusqlite::Result<TaskList> {
    Ok(TaskList {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn item_from_row(row: &rusqlite::Row) -> rusqlite::Result<TaskItem> {
    Ok(TaskItem {
        id: row.get(0)?,
        description: row.get(1)?,
        due_date: parse_stored_due(row.get::<_, Option<String>>(2)?),
        status: row.get::<_, Option<ItemStatus>>(3)?.unwrap_or_default(),
        list_id: row.get(4)?,
    })
}

/// Stored dates are normalized on open; anything unparsable reads back as "no date".
fn parse_stored_due(raw: Option<String>) -> Option<DueDate> {
    raw.and_then(|s| DueDate::parse_input(&s).ok().flatten())
}

fn list_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.prepare_cached("SELECT 1 FROM task_lists WHERE id = ?")?
        .exists([id])
}

fn list_name_taken(conn: &Connection, name: &str, except_id: Option<i64>) -> Result<bool> {
    let taken = conn
        .prepare_cached("SELECT 1 FROM task_lists WHERE name = ?1 AND (?2 IS NULL OR id != ?2)")?
        .exists(params![name, except_id])?;
    Ok(taken)
}

fn description_taken(
    conn: &Connection,
    list_id: i64,
    description: &str,
    except_item: Option<i64>,
) -> Result<bool> {
    let taken = conn
        .prepare_cached(
            "SELECT 1 FROM task_items
             WHERE list_id = ?1 AND description = ?2 AND (?3 IS NULL OR item_id != ?3)",
        )?
        .exists(params![list_id, description, except_item])?;
    Ok(taken)
}

fn item_list_id(conn: &Connection, item_id: i64) -> Result<Option<i64>> {
    let list_id = conn
        .query_row(
            "SELECT list_id FROM task_items WHERE item_id = ?",
            [item_id],
            |row| row.get::<_, Option<i64>>(0),
        )
        .optional()?
        .flatten();
    Ok(list_id)
}

fn to_count(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}
