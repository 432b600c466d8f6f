//! Plain-text rendering of lists and items.

use crate::model::{DueState, ListSummary, TaskItem, TaskList};
use unicode_width::UnicodeWidthStr;

/// Right-pad `s` with spaces to `width` display columns.
#[must_use]
pub fn pad_display(s: &str, width: usize) -> String {
    let current = s.width();
    if current >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - current))
}

/// Widest display width among `names`.
#[must_use]
pub fn max_display_width<'a>(names: impl IntoIterator<Item = &'a str>) -> usize {
    names.into_iter().map(UnicodeWidthStr::width).max().unwrap_or(0)
}

#[must_use]
pub const fn checkbox(item: &TaskItem) -> &'static str {
    if item.is_complete() { "[x]" } else { "[ ]" }
}

/// Marker shown next to a list whose nearest due date needs attention.
#[must_use]
pub const fn due_marker(state: DueState) -> &'static str {
    match state {
        DueState::Overdue => "OVERDUE",
        DueState::Today => "TODAY",
        DueState::Upcoming | DueState::None => "",
    }
}

/// `#3 [ ] Buy milk  (due 2025-06-01)`
#[must_use]
pub fn format_item_line(item: &TaskItem) -> String {
    let mut line = format!("#{} {} {}", item.id, checkbox(item), item.description);
    if let Some(due) = item.due_date {
        line.push_str(&format!("  (due {due})"));
    }
    line
}

/// `#1 Groceries   2/5 done  next 2025-06-01  OVERDUE`
#[must_use]
pub fn format_summary_line(summary: &ListSummary, name_width: usize) -> String {
    let mut line = format!(
        "#{} {}  {}/{} done",
        summary.list.id,
        pad_display(&summary.list.name, name_width),
        summary.completed,
        summary.total
    );
    if let Some(due) = summary.nearest_due {
        line.push_str(&format!("  next {due}"));
    }
    let marker = due_marker(summary.due_state);
    if !marker.is_empty() {
        line.push_str("  ");
        line.push_str(marker);
    }
    line
}

/// `#1 Groceries`
#[must_use]
pub fn format_list_line(list: &TaskList) -> String {
    format!("#{} {}", list.id, list.name)
}

/// `Total: 5  Completed: 2`
#[must_use]
pub fn format_counters(items: &[TaskItem]) -> String {
    let completed = items.iter().filter(|item| item.is_complete()).count();
    format!("Total: {}  Completed: {completed}", items.len())
}
