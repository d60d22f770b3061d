//! Shadow Nova client core.
//!
//! Typed access to the learning platform backend: sign-in and account
//! linking, the project catalogue, and admin settings. Failures of every
//! shape are normalized into one [`AppError`](error::AppError) taxonomy, and
//! the signed-in session is kept in step with durable storage.
//!
//! ```no_run
//! use std::sync::Arc;
//! use shadow_nova::client::Client;
//! use shadow_nova::config::ClientConfig;
//! use shadow_nova::notification::TracingNotifier;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load(None)?;
//! let client = Client::connect(&config, Arc::new(TracingNotifier))?;
//! let projects = client.projects().fetch_projects().await?;
//! println!("{} projects", projects.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod notification;
pub mod result;
pub mod session;
pub mod storage;
pub mod transport;

pub use client::{Client, ClientError};
pub use error::{normalize, AppError, ErrorKind, RawError};
pub use result::{failure, success, ApiResult};
