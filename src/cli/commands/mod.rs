//! Command implementations.

pub mod due;
pub mod item;
pub mod list;
pub mod reset;
pub mod schema;
