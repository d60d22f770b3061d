//! Observable hook state.
//!
//! Every hook owns a [`HookState`]: the last result (`data`), the last error
//! and a loading flag. The state lives in a `tokio::sync::watch` channel so
//! views can either poll [`HookState::snapshot`] or await changes through
//! [`HookState::subscribe`].

use std::future::Future;

use tokio::sync::watch;

use crate::error::{normalize, AppError, RawError};
use crate::result::{failure, success, ApiResult};

/// Point-in-time view of a hook's state.
#[derive(Debug, Clone, PartialEq)]
pub struct HookSnapshot<T> {
    /// Result of the last successful operation.
    pub data: Option<T>,
    /// Error of the last failed operation.
    pub error: Option<AppError>,
    /// True while an operation is in flight.
    pub is_loading: bool,
}

impl<T> Default for HookSnapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
        }
    }
}

/// Observable `data` / `error` / `is_loading` triple.
#[derive(Debug)]
pub struct HookState<T> {
    tx: watch::Sender<HookSnapshot<T>>,
}

impl<T> Default for HookState<T> {
    fn default() -> Self {
        let (tx, _) = watch::channel(HookSnapshot::default());
        Self { tx }
    }
}

impl<T: Clone> HookState<T> {
    /// Create an idle state with no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn snapshot(&self) -> HookSnapshot<T> {
        self.tx.borrow().clone()
    }

    /// Current data.
    pub fn data(&self) -> Option<T> {
        self.tx.borrow().data.clone()
    }

    /// Current error.
    pub fn error(&self) -> Option<AppError> {
        self.tx.borrow().error.clone()
    }

    /// Whether an operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.tx.borrow().is_loading
    }

    /// Receive a notification on every state change.
    pub fn subscribe(&self) -> watch::Receiver<HookSnapshot<T>> {
        self.tx.subscribe()
    }

    /// Enter the loading state and clear any previous error.
    pub(crate) fn begin(&self) {
        self.tx.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }

    /// Leave the loading state after a success, letting `commit` update data.
    pub(crate) fn resolve(&self, commit: impl FnOnce(&mut Option<T>)) {
        self.tx.send_modify(|state| {
            commit(&mut state.data);
            state.is_loading = false;
        });
    }

    /// Leave the loading state after a failure. Data is dropped.
    pub(crate) fn reject(&self, error: AppError) {
        self.tx.send_modify(|state| {
            state.error = Some(error);
            state.data = None;
            state.is_loading = false;
        });
    }

    /// Leave the loading state without an outcome. Data and error stay.
    pub(crate) fn abandon(&self) {
        self.tx.send_if_modified(|state| std::mem::replace(&mut state.is_loading, false));
    }

    /// Clear the error without touching anything else.
    pub(crate) fn clear_error(&self) {
        self.tx.send_if_modified(|state| state.error.take().is_some());
    }

    /// Drop data and error.
    pub(crate) fn reset(&self) {
        self.tx.send_modify(|state| {
            state.data = None;
            state.error = None;
        });
    }
}

/// Clears the loading flag if a tracked operation is dropped before it settles.
struct InFlight<'a, T: Clone> {
    state: &'a HookState<T>,
    settled: bool,
}

impl<T: Clone> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!("operation dropped before completing");
            self.state.abandon();
        }
    }
}

/// Run `operation` under the hook contract.
///
/// The state enters loading, the operation runs, and the outcome is written
/// back (through `commit` on success, [`normalize`] on failure) before this
/// returns. Callers fire callbacks and notifications only afterwards, so
/// observers never see a notification before the state reflects it.
///
/// If the returned future is dropped mid-flight, loading is cleared and
/// data and error are left as they were.
pub(crate) async fn track<T, R, Fut>(
    state: &HookState<T>,
    operation: Fut,
    commit: impl FnOnce(&mut Option<T>, &R),
) -> ApiResult<R>
where
    T: Clone,
    Fut: Future<Output = Result<R, RawError>>,
{
    state.begin();
    let mut in_flight = InFlight { state, settled: false };
    let outcome = operation.await;
    in_flight.settled = true;
    match outcome {
        Ok(value) => {
            state.resolve(|data| commit(data, &value));
            success(value)
        }
        Err(raw) => {
            let error = normalize(raw);
            tracing::debug!(code = error.code(), error = %error, "operation failed");
            state.reject(error.clone());
            failure(error)
        }
    }
}
