//! Generic request hook.
//!
//! [`ApiHook`] wraps any async call that can fail with a [`RawError`] and
//! gives it the standard hook behavior: observable state, normalized errors,
//! and optional success/error callbacks.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::task::JoinHandle;

use super::state::{track, HookSnapshot, HookState};
use crate::error::{AppError, RawError};
use crate::result::ApiResult;

type Fetcher<A, T> = Box<dyn Fn(A) -> BoxFuture<'static, Result<T, RawError>> + Send + Sync>;
type SuccessCallback<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&AppError) + Send + Sync>;

/// A stateful wrapper around one fallible async call taking `A`.
pub struct ApiHook<A, T> {
    fetcher: Fetcher<A, T>,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
    state: HookState<T>,
}

impl<A, T> ApiHook<A, T>
where
    A: Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Wrap `fetcher`.
    pub fn new<F, Fut>(fetcher: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, RawError>> + Send + 'static,
    {
        Self {
            fetcher: Box::new(move |args| fetcher(args).boxed()),
            on_success: None,
            on_error: None,
            state: HookState::new(),
        }
    }

    /// Run `callback` after every successful execution.
    pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Run `callback` after every failed execution.
    pub fn on_error(mut self, callback: impl Fn(&AppError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Call the wrapped function with `args`.
    ///
    /// State is updated before any callback runs.
    pub async fn execute(&self, args: A) -> ApiResult<T> {
        let result = track(&self.state, (self.fetcher)(args), |data, value: &T| {
            *data = Some(value.clone());
        })
        .await;

        match &result {
            Ok(value) => {
                if let Some(callback) = &self.on_success {
                    callback(value);
                }
            }
            Err(error) => {
                if let Some(callback) = &self.on_error {
                    callback(error);
                }
            }
        }
        result
    }

    /// Start an execution without waiting for it.
    ///
    /// Mirrors constructing the hook in "immediate" mode: the call runs on
    /// the tokio runtime and its outcome lands in the hook state.
    pub fn spawn(self: &Arc<Self>, args: A) -> JoinHandle<ApiResult<T>> {
        let hook = Arc::clone(self);
        tokio::spawn(async move { hook.execute(args).await })
    }

    /// The hook's observable state.
    pub fn state(&self) -> &HookState<T> {
        &self.state
    }

    /// Current state.
    pub fn snapshot(&self) -> HookSnapshot<T> {
        self.state.snapshot()
    }
}
