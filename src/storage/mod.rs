//! `SQLite` storage layer for `todo_lists`.
//!
//! - [`schema`] - Table definitions and the destructive upgrade policy
//! - [`sqlite`] - [`SqliteStore`], the only code that touches the tables

pub mod schema;
pub mod sqlite;

pub use sqlite::{MutationContext, SqliteStore};
