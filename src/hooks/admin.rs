//! Admin settings hook.

use std::sync::Arc;

use serde_json::Value;

use super::state::{track, HookSnapshot, HookState};
use crate::api::AdminApi;
use crate::error::AppError;
use crate::notification::Notifier;
use crate::result::ApiResult;

/// Updates system settings. `data` holds the backend's last response.
pub struct AdminHook {
    api: AdminApi,
    notifier: Arc<dyn Notifier>,
    state: HookState<Value>,
}

impl AdminHook {
    pub fn new(api: AdminApi, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: HookState::new(),
        }
    }

    /// Set how many times per day the content collector runs.
    pub async fn update_collector_frequency(&self, runs_per_day: u32) -> ApiResult<Value> {
        let result = track(
            &self.state,
            self.api.update_collector_frequency(runs_per_day),
            |data, response: &Value| *data = Some(response.clone()),
        )
        .await;
        self.report(&result, &format!("Collector runs {} times per day", runs_per_day));
        result
    }

    /// Set a single system setting.
    pub async fn update_system_setting(&self, key: &str, value: &str) -> ApiResult<Value> {
        let result = track(
            &self.state,
            self.api.update_system_setting(key, value),
            |data, response: &Value| *data = Some(response.clone()),
        )
        .await;
        self.report(&result, &format!("{} set to {}", key, value));
        result
    }

    fn report(&self, result: &ApiResult<Value>, description: &str) {
        match result {
            Ok(_) => self.notifier.success("Settings updated", Some(description)),
            Err(error) => self.notifier.show_error(error),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<AppError> {
        self.state.error()
    }

    pub fn snapshot(&self) -> HookSnapshot<Value> {
        self.state.snapshot()
    }

    pub fn state(&self) -> &HookState<Value> {
        &self.state
    }
}
