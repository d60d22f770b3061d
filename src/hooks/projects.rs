//! Project catalogue hook.

use std::sync::Arc;

use super::state::{track, HookSnapshot, HookState};
use crate::api::{CreateProjectRequest, Project, ProjectsApi, SubmitProjectRequest};
use crate::error::AppError;
use crate::notification::Notifier;
use crate::result::ApiResult;

/// Holds the project list and exposes the project endpoints.
pub struct ProjectsHook {
    api: ProjectsApi,
    notifier: Arc<dyn Notifier>,
    state: HookState<Vec<Project>>,
}

impl ProjectsHook {
    pub fn new(api: ProjectsApi, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: HookState::new(),
        }
    }

    /// Reload the list, replacing whatever was held before.
    pub async fn fetch_projects(&self) -> ApiResult<Vec<Project>> {
        let result = track(&self.state, self.api.get_projects(), |data, projects: &Vec<Project>| {
            *data = Some(projects.clone());
        })
        .await;

        if let Err(error) = &result {
            self.notifier.show_error(error);
        }
        result
    }

    /// Create a project and append it to the list.
    pub async fn create_project(&self, request: &CreateProjectRequest) -> ApiResult<Project> {
        let result = track(&self.state, self.api.create_project(request), |data, project: &Project| {
            data.get_or_insert_with(Vec::new).push(project.clone());
        })
        .await;

        match &result {
            Ok(project) => self
                .notifier
                .success("Project created", Some(&project.title)),
            Err(error) => self.notifier.show_error(error),
        }
        result
    }

    /// Submit work for a project. The list is left as is.
    pub async fn submit_project(&self, request: &SubmitProjectRequest) -> ApiResult<()> {
        let result = track(&self.state, self.api.submit_project(request), |_, _| {}).await;

        match &result {
            Ok(()) => self
                .notifier
                .success("Project submitted", Some(&request.github_repo_url)),
            Err(error) => self.notifier.show_error(error),
        }
        result
    }

    /// The current list. Empty before the first fetch and after a failure.
    pub fn projects(&self) -> Vec<Project> {
        self.state.data().unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<AppError> {
        self.state.error()
    }

    pub fn snapshot(&self) -> HookSnapshot<Vec<Project>> {
        self.state.snapshot()
    }

    /// The hook's observable state.
    pub fn state(&self) -> &HookState<Vec<Project>> {
        &self.state
    }
}
