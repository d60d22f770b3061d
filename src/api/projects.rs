//! Project catalogue endpoints.

use std::sync::Arc;

use super::decode_envelope;
use super::models::{CreateProjectRequest, Project, SubmitProjectRequest};
use crate::error::RawError;
use crate::transport::{ApiRequest, Transport};

/// Listing, creating and submitting projects.
#[derive(Clone)]
pub struct ProjectsApi {
    transport: Arc<dyn Transport>,
}

impl ProjectsApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch the full project list.
    pub async fn get_projects(&self) -> Result<Vec<Project>, RawError> {
        let response = self.transport.send(ApiRequest::get("/projects")).await?;
        decode_envelope(response.data)
    }

    /// Create a project and return it as stored by the backend.
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, RawError> {
        let response = self
            .transport
            .send(ApiRequest::post("/projects", request)?)
            .await?;
        decode_envelope(response.data)
    }

    /// Submit work for a project.
    pub async fn submit_project(&self, request: &SubmitProjectRequest) -> Result<(), RawError> {
        self.transport
            .send(ApiRequest::post("/projects/submit", request)?)
            .await?;
        Ok(())
    }
}
