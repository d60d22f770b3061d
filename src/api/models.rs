//! Wire types exchanged with the backend.

use serde::{Deserialize, Serialize};

/// An authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Linked GitHub account, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
}

/// Payload returned by the login and OAuth callback endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The signed-in user.
    pub user: User,
}

/// A project from the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Request body for creating a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub technologies: Vec<String>,
}

/// Request body for submitting work on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitProjectRequest {
    pub project_id: String,
    pub github_repo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

/// Collector scheduling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorSettings {
    /// How many times per day the content collector runs.
    pub runs_per_day: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_optional_fields_default() {
        let user: User =
            serde_json::from_str(r#"{"id":"1","email":"a@b.c","name":"Ada"}"#).unwrap();
        assert_eq!(user.name, "Ada");
        assert!(user.picture.is_none());
        assert!(user.github_username.is_none());
    }

    #[test]
    fn test_user_skips_empty_optionals() {
        let user = User {
            id: "1".to_string(),
            email: "a@b.c".to_string(),
            name: "Ada".to_string(),
            picture: None,
            github_username: Some("ada".to_string()),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("picture"));
        assert!(json.contains("\"github_username\":\"ada\""));
    }

    #[test]
    fn test_project_minimal_payload() {
        let project: Project = serde_json::from_str(r#"{"id":"p1","title":"CLI"}"#).unwrap();
        assert_eq!(project.id, "p1");
        assert!(project.tech_stack.is_empty());
        assert!(project.created_at.is_none());
    }

    #[test]
    fn test_submit_request_serialize() {
        let request = SubmitProjectRequest {
            project_id: "p1".to_string(),
            github_repo_url: "https://github.com/ada/p1".to_string(),
            pr_url: None,
            demo_url: Some("https://p1.example.com".to_string()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["project_id"], "p1");
        assert!(json.get("pr_url").is_none());
        assert_eq!(json["demo_url"], "https://p1.example.com");
    }
}
