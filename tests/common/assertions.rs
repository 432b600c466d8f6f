#![allow(dead_code)]

use todo_lists::model::{ItemStatus, TaskItem};
use todo_lists::storage::SqliteStore;
use tracing::info;

pub fn item_ids(storage: &SqliteStore, list_id: i64) -> Vec<i64> {
    storage
        .list_items(list_id)
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect()
}

pub fn find_item(storage: &SqliteStore, list_id: i64, item_id: i64) -> Option<TaskItem> {
    storage
        .list_items(list_id)
        .unwrap()
        .into_iter()
        .find(|item| item.id == item_id)
}

pub fn assert_status(storage: &SqliteStore, item_id: i64, expected: ItemStatus) {
    info!("Asserting status of item {} is {:?}", item_id, expected);
    let item = storage
        .get_item(item_id)
        .unwrap()
        .unwrap_or_else(|| panic!("item {item_id} should exist"));
    assert_eq!(item.status, expected, "status of item {item_id}");
}

pub fn assert_list_count(storage: &SqliteStore, expected: usize) {
    assert_eq!(storage.count_lists().unwrap(), expected, "list count");
}
