//! Error taxonomy and normalization
//!
//! This module turns raw transport failures into a closed set of typed
//! errors. Hooks never surface a [`RawError`]; they always hand back an
//! [`AppError`] produced by [`normalize`].

pub mod app_error;
pub mod kind;
pub mod raw;

pub use app_error::{normalize, AppError};
pub use kind::{ErrorKind, UNEXPECTED_ERROR_MESSAGE};
pub use raw::RawError;
