//! Convenience result type alias for LinkMD.

use crate::error::AppError;

/// A specialized `Result` type for LinkMD operations.
pub type AppResult<T> = Result<T, AppError>;
