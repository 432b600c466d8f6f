//! Output formatting for `todo_lists`.
//!
//! Supports human-readable text output and machine-parseable JSON.

mod context;
mod text;

pub use context::{OutputContext, OutputMode};
pub use text::{
    checkbox, due_marker, format_counters, format_item_line, format_list_line,
    format_summary_line, max_display_width, pad_display,
};
