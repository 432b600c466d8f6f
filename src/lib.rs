//! `todo_lists` - offline task lists with due dates.
//!
//! # Architecture
//!
//! - [`storage`] - `SQLite` schema and the [`storage::SqliteStore`] task store
//! - [`model`] - Data types (TaskList, TaskItem, DueDate)
//! - [`validation`] - Input checks for names and descriptions
//! - [`config`] - Layered configuration and database path resolution
//! - [`error`] - Error types and handling
//! - [`format`] - Output formatting (text, JSON)
//! - [`cli`] - Command-line interface using clap

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod storage;
pub mod validation;

pub use error::{ErrorCode, Result, StructuredError, TodoError};
