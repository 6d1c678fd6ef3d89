//! Unified application error types for LinkMD.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Invariant violations of the archive
//! (name conflicts, cycles, depth limit, missing records, empty names,
//! insufficient split headings) have their own kinds so callers can tell
//! them apart from infrastructure failures.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// An empty or malformed name, filename, or input.
    Validation,
    /// The requested project, folder, or document was not found.
    NotFound,
    /// A sibling folder name or folder-scoped filename is already taken.
    Conflict,
    /// Moving a folder would make it its own ancestor.
    CircularReference,
    /// The folder tree would grow beyond the depth limit.
    DepthLimitExceeded,
    /// A split found zero or one section at the requested heading level.
    SplitInsufficientHeadings,
    /// A database error occurred.
    Database,
    /// A physical mirror I/O error occurred.
    Storage,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code for the kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "NAME_CONFLICT",
            Self::CircularReference => "CIRCULAR_REFERENCE",
            Self::DepthLimitExceeded => "DEPTH_LIMIT_EXCEEDED",
            Self::SplitInsufficientHeadings => "SPLIT_INSUFFICIENT_HEADINGS",
            Self::Database => "DATABASE",
            Self::Storage => "STORAGE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout LinkMD.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a name-conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a circular-reference error.
    pub fn circular_reference(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CircularReference, message)
    }

    /// Create a depth-limit error.
    pub fn depth_limit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DepthLimitExceeded, message)
    }

    /// Create an insufficient-headings error for splits.
    pub fn split_insufficient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SplitInsufficientHeadings, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error was raised before any mutation and can be retried
    /// once the caller corrects its input.
    pub fn is_retryable_input(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Validation
                | ErrorKind::NotFound
                | ErrorKind::Conflict
                | ErrorKind::CircularReference
                | ErrorKind::DepthLimitExceeded
                | ErrorKind::SplitInsufficientHeadings
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Row not found"),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Self::with_source(
                    ErrorKind::Conflict,
                    format!("Duplicate key rejected by the store: {}", db_err.message()),
                    err,
                )
            }
            _ => Self::with_source(ErrorKind::Database, format!("Database error: {err}"), err),
        }
    }
}
