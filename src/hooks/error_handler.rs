//! Standalone error slot for views that run their own operations.

use tokio::sync::watch;

use crate::error::{normalize, AppError, RawError};

/// Holds at most one current error.
#[derive(Debug)]
pub struct ErrorHandler {
    current: watch::Sender<Option<AppError>>,
}

impl Default for ErrorHandler {
    fn default() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }
}

impl ErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current error.
    pub fn set_error(&self, error: AppError) {
        tracing::error!(code = error.code(), status = ?error.status(), error = %error, "error recorded");
        self.current.send_replace(Some(error));
    }

    /// Normalize `raw` and record it. Returns the normalized error.
    pub fn set_raw(&self, raw: RawError) -> AppError {
        let error = normalize(raw);
        self.set_error(error.clone());
        error
    }

    pub fn clear_error(&self) {
        self.current.send_if_modified(|current| current.take().is_some());
    }

    pub fn error(&self) -> Option<AppError> {
        self.current.borrow().clone()
    }

    /// Display text for the current error, if any.
    pub fn user_message(&self) -> Option<String> {
        self.current.borrow().as_ref().map(AppError::user_message)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AppError>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_set_and_clear() {
        let handler = ErrorHandler::new();
        assert!(handler.error().is_none());
        assert!(handler.user_message().is_none());

        handler.set_error(normalize(RawError::status(502)));
        assert_eq!(handler.error().map(|e| e.kind()), Some(ErrorKind::Api));
        assert_eq!(
            handler.user_message().as_deref(),
            Some("Something went wrong. Please try again.")
        );

        handler.clear_error();
        assert!(handler.error().is_none());
    }

    #[test]
    fn test_set_raw_normalizes() {
        let handler = ErrorHandler::new();
        let error = handler.set_raw(RawError::response(400, "email is invalid"));
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(handler.user_message().as_deref(), Some("email is invalid"));
    }

    #[test]
    fn test_subscribers_see_changes() {
        let handler = ErrorHandler::new();
        let mut rx = handler.subscribe();

        handler.clear_error();
        assert!(!rx.has_changed().unwrap());

        handler.set_raw(RawError::failure("offline"));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_some());
    }
}
