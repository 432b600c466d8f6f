#![allow(dead_code)]

use super::*;

/// Two lists, "Home" and "Work", each with a few items.
pub struct TwoLists {
    pub storage: SqliteStore,
    pub home: i64,
    pub work: i64,
    pub home_items: Vec<i64>,
    pub work_items: Vec<i64>,
}

pub fn scenario_two_lists() -> TwoLists {
    let mut storage = test_db();
    let home = storage.create_list("Home").unwrap();
    let work = storage.create_list("Work").unwrap();

    let home_items = vec![
        storage
            .create_item(home, "Sweep", Some("2025-03-01".parse().unwrap()))
            .unwrap(),
        storage.create_item(home, "Water plants", None).unwrap(),
    ];
    let work_items = vec![
        storage
            .create_item(work, "File report", Some("2025-01-15".parse().unwrap()))
            .unwrap(),
    ];

    storage.drain_changes();

    TwoLists {
        storage,
        home,
        work,
        home_items,
        work_items,
    }
}
