//! Resource hooks.
//!
//! A hook wraps a group of backend operations with observable state
//! (`data`, `error`, `is_loading`). Every async operation follows the same
//! sequence:
//!
//! 1. enter loading and clear the previous error
//! 2. call the typed API
//! 3. write the outcome back to the state (errors are normalized into
//!    [`AppError`](crate::error::AppError) and drop `data`)
//! 4. fire callbacks or notifications
//! 5. return an [`ApiResult`](crate::result::ApiResult)
//!
//! Overlapping calls on the same hook are not serialized. Each resolves on
//! its own and whichever completes last determines the final state.

pub mod admin;
pub mod api;
pub mod auth;
pub mod error_handler;
pub mod projects;
mod state;

pub use admin::AdminHook;
pub use api::ApiHook;
pub use auth::AuthHook;
pub use error_handler::ErrorHandler;
pub use projects::ProjectsHook;
pub use state::{HookSnapshot, HookState};
