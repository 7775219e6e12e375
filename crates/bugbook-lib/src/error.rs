//! Error types for `bugbook-lib`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for bugbook store operations.
#[derive(Error, Debug)]
pub enum BugbookError {
    // === Record Errors ===
    /// Bug with the specified ID was not found.
    #[error("Bug not found: {id}")]
    BugNotFound { id: String },

    /// No user is registered under the given email.
    #[error("User not found: {email}")]
    UserNotFound { email: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    /// Invalid status value.
    #[error("Invalid status: {status} (expected new, in_progress or resolved)")]
    InvalidStatus { status: String },

    /// Invalid priority value.
    #[error("Invalid priority: {priority} (expected low, medium or high)")]
    InvalidPriority { priority: String },

    // === Codec Errors ===
    /// Content was neither a JSON nor a YAML sequence of records.
    #[error("Could not parse records as JSON ({json}) or YAML ({yaml})")]
    Decode { json: String, yaml: String },

    /// Writing a backing file failed. In-memory state is unaffected.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl BugbookError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }

    /// True for failures that leave the in-memory store intact but the
    /// backing file stale.
    #[must_use]
    pub const fn is_write_failure(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

/// Result type using `BugbookError`.
pub type Result<T> = std::result::Result<T, BugbookError>;
