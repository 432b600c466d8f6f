//! Storage tests for the on-disk schema and the destructive upgrade.

mod common;

use chrono::NaiveDate;
use common::{test_db, test_db_path, test_db_with_dir};
use rusqlite::Connection;
use std::collections::HashSet;
use todo_lists::model::DueDate;
use todo_lists::storage::SqliteStore;
use todo_lists::storage::schema::CURRENT_SCHEMA_VERSION;

fn table_names(conn: &Connection) -> HashSet<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")
        .expect("prepare table list");
    stmt.query_map([], |row| row.get(0))
        .expect("query table list")
        .collect::<std::result::Result<HashSet<String>, _>>()
        .expect("collect table list")
}

#[test]
fn schema_tables_and_columns_exist() {
    let (storage, dir) = test_db_with_dir();
    assert_eq!(
        storage.table_columns("task_lists").unwrap(),
        vec!["id", "name"]
    );
    drop(storage);

    let conn = Connection::open(test_db_path(&dir)).expect("open db");
    let tables = table_names(&conn);
    for table in ["task_lists", "task_items"] {
        assert!(tables.contains(table), "missing table: {table}");
    }
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap();
    assert_eq!(version, CURRENT_SCHEMA_VERSION);
}

#[test]
fn data_persists_across_reopen() {
    let (mut storage, dir) = test_db_with_dir();
    let list = storage.create_list("Home").unwrap();
    storage.create_item(list, "Sweep", None).unwrap();
    drop(storage);

    let storage = SqliteStore::open(&test_db_path(&dir)).unwrap();
    assert_eq!(storage.list_all_list_names().unwrap(), vec!["Home"]);
    assert_eq!(storage.list_items(list).unwrap().len(), 1);
}

#[test]
fn upgrade_deletes_all_lists_and_items() {
    let mut storage = test_db();
    let home = storage.create_list("Home").unwrap();
    let work = storage.create_list("Work").unwrap();
    let item = storage.create_item(home, "Sweep", None).unwrap();
    storage.drain_changes();

    storage.upgrade_schema(CURRENT_SCHEMA_VERSION + 1).unwrap();

    assert!(storage.list_all_lists().unwrap().is_empty());
    assert!(storage.list_items(home).unwrap().is_empty());
    assert!(storage.get_item(item).unwrap().is_none());
    assert_eq!(storage.schema_version().unwrap(), CURRENT_SCHEMA_VERSION + 1);
    assert_eq!(storage.drain_changes(), vec![home, work]);

    // The store is usable again after the upgrade.
    let fresh = storage.create_list("Home").unwrap();
    assert!(fresh > 0);
}

#[test]
fn stale_version_on_disk_is_wiped_on_open() {
    let (mut storage, dir) = test_db_with_dir();
    storage.create_list("Old data").unwrap();
    drop(storage);

    let conn = Connection::open(test_db_path(&dir)).unwrap();
    conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION + 5)
        .unwrap();
    drop(conn);

    let storage = SqliteStore::open(&test_db_path(&dir)).unwrap();
    assert_eq!(storage.count_lists().unwrap(), 0);
    assert_eq!(storage.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn reset_keeps_current_version() {
    let mut storage = test_db();
    storage.create_list("Home").unwrap();
    storage.reset().unwrap();
    assert_eq!(storage.count_lists().unwrap(), 0);
    assert_eq!(storage.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn day_first_rows_are_normalized_on_open() {
    let (mut storage, dir) = test_db_with_dir();
    let list = storage.create_list("Legacy").unwrap();
    drop(storage);

    // Rows written by an older client that stored DD/MM/YYYY.
    let conn = Connection::open(test_db_path(&dir)).unwrap();
    conn.execute(
        "INSERT INTO task_items (description, due_date, status, list_id) VALUES
            ('Pay rent', '10/01/2025', 0, ?1),
            ('Renew passport', '2025-03-01', 0, ?1),
            ('Someday', 'not a date', 0, ?1)",
        [list],
    )
    .unwrap();
    drop(conn);

    let storage = SqliteStore::open(&test_db_path(&dir)).unwrap();
    let expected: Option<DueDate> = Some("2025-01-10".parse().unwrap());

    assert_eq!(storage.nearest_due_date(list).unwrap(), expected);
    let summaries = storage
        .list_summaries(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
        .unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].nearest_due, expected);
    assert_eq!(summaries[0].total, 3);

    let dues: Vec<Option<DueDate>> = storage
        .list_items(list)
        .unwrap()
        .into_iter()
        .map(|item| item.due_date)
        .collect();
    assert_eq!(dues, vec![expected, Some("2025-03-01".parse().unwrap()), None]);
    drop(storage);

    let conn = Connection::open(test_db_path(&dir)).unwrap();
    let stored: Vec<Option<String>> = conn
        .prepare("SELECT due_date FROM task_items ORDER BY item_id")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<std::result::Result<_, _>>()
        .unwrap();
    assert_eq!(
        stored,
        vec![
            Some("2025-01-10".to_string()),
            Some("2025-03-01".to_string()),
            None
        ]
    );
}

#[test]
fn upgrade_to_other_version_wipes_again_on_reopen() {
    let (mut storage, dir) = test_db_with_dir();
    storage.upgrade_schema(CURRENT_SCHEMA_VERSION + 1).unwrap();
    storage.create_list("Written after upgrade").unwrap();
    drop(storage);

    let storage = SqliteStore::open(&test_db_path(&dir)).unwrap();
    assert_eq!(storage.count_lists().unwrap(), 0);
    assert_eq!(storage.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
}
