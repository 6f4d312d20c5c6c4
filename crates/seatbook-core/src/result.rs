//! Convenience result type alias for SeatBook.

use crate::error::AppError;

/// A specialized `Result` type for SeatBook operations.
pub type AppResult<T> = Result<T, AppError>;
