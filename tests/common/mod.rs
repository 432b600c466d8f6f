#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;
use tempfile::TempDir;
use todo_lists::storage::SqliteStore;

pub mod assertions;
pub mod scenarios;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        todo_lists::logging::init_test_logging();
    });
}

pub fn test_db() -> SqliteStore {
    init_test_logging();
    SqliteStore::open_memory().expect("Failed to create test database")
}

pub fn test_db_path(dir: &TempDir) -> PathBuf {
    dir.path().join(".todo").join("tasks.db")
}

pub fn test_db_with_dir() -> (SqliteStore, TempDir) {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = test_db_path(&dir);
    std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
    let storage = SqliteStore::open(&db_path).expect("Failed to create test database");
    (storage, dir)
}
