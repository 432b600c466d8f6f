//! Core data types: task lists, task items, due dates.

use crate::error::{Result, TodoError};
use chrono::NaiveDate;
use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical on-disk date layout. Zero-padded so string order is date order.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Day-first layout some callers still produce. Accepted on input only.
pub const DAY_FIRST_DATE_FORMAT: &str = "%d/%m/%Y";

/// A named container of task items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaskList {
    pub id: i64,
    pub name: String,
}

/// A single to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaskItem {
    pub id: i64,
    pub description: String,
    pub due_date: Option<DueDate>,
    pub status: ItemStatus,
    pub list_id: i64,
}

impl TaskItem {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.status, ItemStatus::Complete)
    }
}

/// Completion flag, stored as `0` / `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ItemStatus {
    #[default]
    Incomplete,
    Complete,
}

impl ItemStatus {
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Incomplete => 0,
            Self::Complete => 1,
        }
    }

    #[must_use]
    pub const fn from_complete(complete: bool) -> Self {
        if complete {
            Self::Complete
        } else {
            Self::Incomplete
        }
    }
}

impl From<ItemStatus> for u8 {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Incomplete => 0,
            ItemStatus::Complete => 1,
        }
    }
}

impl TryFrom<u8> for ItemStatus {
    type Error = TodoError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Incomplete),
            1 => Ok(Self::Complete),
            other => Err(TodoError::validation(
                "status",
                format!("expected 0 or 1, got {other}"),
            )),
        }
    }
}

impl JsonSchema for ItemStatus {
    fn schema_name() -> String {
        "ItemStatus".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <u8 as JsonSchema>::json_schema(generator)
    }
}

impl ToSql for ItemStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_i64()))
    }
}

impl FromSql for ItemStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_i64()? {
            0 => Ok(Self::Incomplete),
            1 => Ok(Self::Complete),
            other => Err(FromSqlError::OutOfRange(other)),
        }
    }
}

/// A calendar due date.
///
/// Always stored and serialized as `YYYY-MM-DD`. [`DueDate::parse_input`] also
/// accepts `DD/MM/YYYY` and normalizes it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct DueDate(NaiveDate);

impl DueDate {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Parse user input. Blank input means "no due date".
    ///
    /// # Errors
    ///
    /// Returns a validation error if the input is neither `YYYY-MM-DD` nor
    /// `DD/MM/YYYY`.
    pub fn parse_input(input: &str) -> Result<Option<Self>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl FromStr for DueDate {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, CANONICAL_DATE_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(s, DAY_FIRST_DATE_FORMAT))
            .map(Self)
            .map_err(|_| {
                TodoError::validation(
                    "due_date",
                    format!("'{s}' is not a date (expected YYYY-MM-DD or DD/MM/YYYY)"),
                )
            })
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_DATE_FORMAT))
    }
}

impl From<NaiveDate> for DueDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl ToSql for DueDate {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for DueDate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        NaiveDate::parse_from_str(text.trim(), CANONICAL_DATE_FORMAT)
            .map(Self)
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// How urgent a list's nearest due date is relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DueState {
    Overdue,
    Today,
    Upcoming,
    None,
}

impl DueState {
    #[must_use]
    pub fn classify(nearest: Option<DueDate>, today: NaiveDate) -> Self {
        match nearest {
            None => Self::None,
            Some(due) if due.date() < today => Self::Overdue,
            Some(due) if due.date() == today => Self::Today,
            Some(_) => Self::Upcoming,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Today => "today",
            Self::Upcoming => "upcoming",
            Self::None => "none",
        }
    }
}

/// Overview of one list: counters plus its nearest due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ListSummary {
    #[serde(flatten)]
    pub list: TaskList,
    pub total: usize,
    pub completed: usize,
    pub nearest_due: Option<DueDate>,
    pub due_state: DueState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        let due: DueDate = "2025-06-01".parse().unwrap();
        assert_eq!(due.date(), date(2025, 6, 1));
        assert_eq!(due.to_string(), "2025-06-01");
    }

    #[test]
    fn day_first_input_is_normalized() {
        let due: DueDate = "05/03/2025".parse().unwrap();
        assert_eq!(due.to_string(), "2025-03-05");
    }

    #[test]
    fn blank_input_means_no_date() {
        assert_eq!(DueDate::parse_input("   ").unwrap(), None);
        assert_eq!(DueDate::parse_input("").unwrap(), None);
    }

    #[test]
    fn garbage_dates_are_rejected() {
        let err = DueDate::parse_input("next tuesday").unwrap_err();
        assert!(matches!(err, TodoError::Validation { ref field, .. } if field == "due_date"));
        assert!("2025-13-40".parse::<DueDate>().is_err());
    }

    #[test]
    fn canonical_strings_sort_like_dates() {
        let a: DueDate = "09/01/2025".parse().unwrap();
        let b: DueDate = "2025-01-10".parse().unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn due_state_classification() {
        let today = date(2025, 3, 1);
        let past = Some(DueDate::new(date(2025, 2, 28)));
        let same = Some(DueDate::new(today));
        let future = Some(DueDate::new(date(2025, 3, 2)));
        assert_eq!(DueState::classify(past, today), DueState::Overdue);
        assert_eq!(DueState::classify(same, today), DueState::Today);
        assert_eq!(DueState::classify(future, today), DueState::Upcoming);
        assert_eq!(DueState::classify(None, today), DueState::None);
    }

    #[test]
    fn status_serializes_as_integer_flag() {
        assert_eq!(serde_json::to_value(ItemStatus::Complete).unwrap(), 1);
        let status: ItemStatus = serde_json::from_str("0").unwrap();
        assert_eq!(status, ItemStatus::Incomplete);
        assert!(serde_json::from_str::<ItemStatus>("2").is_err());
    }

    #[test]
    fn item_json_shape() {
        let item = TaskItem {
            id: 3,
            description: "Buy milk".to_string(),
            due_date: Some("2025-06-01".parse().unwrap()),
            status: ItemStatus::Incomplete,
            list_id: 1,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["due_date"], "2025-06-01");
        assert_eq!(json["status"], 0);
        assert_eq!(json["list_id"], 1);
    }
}
