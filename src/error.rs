//! Error types for `todo_lists`.
//!
//! Every store operation reports failure through [`TodoError`]. Validation,
//! duplicate and not-found conditions are distinct variants so callers can
//! tell a rejected write apart from a storage failure.

use serde::Serialize;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = TodoError> = std::result::Result<T, E>;

/// Primary error type.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("task list '{name}' already exists")]
    DuplicateList { name: String },

    #[error("item '{description}' already exists in list {list_id}")]
    DuplicateItem { list_id: i64, description: String },

    #[error("task list not found: {id}")]
    ListNotFound { id: i64 },

    #[error("task item not found: {id}")]
    ItemNotFound { id: i64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TodoError {
    /// Build a validation error for `field`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::DuplicateList { .. } | Self::DuplicateItem { .. } => ErrorCode::Duplicate,
            Self::ListNotFound { .. } | Self::ItemNotFound { .. } => ErrorCode::NotFound,
            Self::Config(_) | Self::Yaml(_) => ErrorCode::ConfigError,
            Self::Database(_) => ErrorCode::StorageError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::InternalError,
        }
    }

    /// Process exit status for the CLI.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self.code() {
            ErrorCode::ValidationFailed => 2,
            ErrorCode::Duplicate => 3,
            ErrorCode::NotFound => 4,
            ErrorCode::ConfigError => 5,
            ErrorCode::StorageError | ErrorCode::IoError => 6,
            ErrorCode::InternalError => 1,
        }
    }

    /// A short remediation hint, when one applies.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::DuplicateList { .. } => Some("choose a different list name".to_string()),
            Self::DuplicateItem { .. } => {
                Some("edit the existing item or use a different description".to_string())
            }
            Self::ListNotFound { .. } => Some("run `todo list show` to see list ids".to_string()),
            Self::ItemNotFound { .. } => {
                Some("run `todo item ls <list-id>` to see item ids".to_string())
            }
            Self::Database(_) => Some("check that the database file is writable".to_string()),
            _ => None,
        }
    }

    /// Whether this error is a rejected write rather than an infrastructure failure.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::ValidationFailed | ErrorCode::Duplicate | ErrorCode::NotFound
        )
    }
}

/// Stable error codes for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    Duplicate,
    NotFound,
    ConfigError,
    StorageError,
    IoError,
    InternalError,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::Duplicate => "DUPLICATE",
            Self::NotFound => "NOT_FOUND",
            Self::ConfigError => "CONFIG_ERROR",
            Self::StorageError => "STORAGE_ERROR",
            Self::IoError => "IO_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// Error envelope printed in JSON mode.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    pub code: ErrorCode,
    pub message: String,
    pub hint: Option<String>,
}

impl StructuredError {
    #[must_use]
    pub fn from_error(err: &TodoError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            hint: err.hint(),
        }
    }

    /// Render as `{"error": {...}}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self })
    }
}
