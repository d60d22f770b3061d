//! Result wrapper returned by every fallible hook operation.
//!
//! `ApiResult<T>` is a plain [`Result`] over [`AppError`], so a value and an
//! error can never be present at the same time.

use crate::error::AppError;

/// Outcome of a hook operation.
pub type ApiResult<T> = Result<T, AppError>;

/// Wraps a successful value.
pub fn success<T>(value: T) -> ApiResult<T> {
    Ok(value)
}

/// Wraps a normalized error.
pub fn failure<T>(error: AppError) -> ApiResult<T> {
    Err(error)
}
