//! Admin settings endpoints.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::models::CollectorSettings;
use crate::error::RawError;
use crate::transport::{ApiRequest, Transport};

const COLLECTOR_SETTINGS_PATH: &str = "/admin/settings/collector";

/// System settings exposed to administrators.
#[derive(Clone)]
pub struct AdminApi {
    transport: Arc<dyn Transport>,
}

impl AdminApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Set a single system setting. Returns the backend's response body.
    pub async fn update_system_setting(&self, key: &str, value: &str) -> Result<Value, RawError> {
        let mut body = Map::new();
        body.insert(key.to_string(), Value::String(value.to_string()));
        let request = ApiRequest::post(COLLECTOR_SETTINGS_PATH, &body)?;
        Ok(self.transport.send(request).await?.data)
    }

    /// Set how many times per day the content collector runs.
    pub async fn update_collector_frequency(&self, runs_per_day: u32) -> Result<Value, RawError> {
        let request = ApiRequest::post(COLLECTOR_SETTINGS_PATH, &CollectorSettings { runs_per_day })?;
        Ok(self.transport.send(request).await?.data)
    }
}
