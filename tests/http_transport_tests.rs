//! End-to-end tests against a local backend.
//!
//! Each test starts an axum server on an ephemeral port and drives it through
//! a real [`Client`] with file-backed session storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;

use shadow_nova::api::{CreateProjectRequest, SubmitProjectRequest};
use shadow_nova::config::ClientConfig;
use shadow_nova::notification::{ChannelNotifier, NoopNotifier};
use shadow_nova::storage::{DurableStorage, FileStorage, TOKEN_KEY, USER_KEY};
use shadow_nova::{Client, ErrorKind};

const GOOD_GOOGLE_TOKEN: &str = "google-ok";
const SESSION_TOKEN: &str = "tok-1";

#[derive(Clone, Default)]
struct Backend {
    authorization: Arc<Mutex<Vec<Option<String>>>>,
    codes: Arc<Mutex<Vec<String>>>,
}

fn user_json() -> Value {
    json!({ "id": "u1", "email": "ada@example.com", "name": "Ada" })
}

async fn google_login(Json(body): Json<Value>) -> Response {
    if body["token"] == GOOD_GOOGLE_TOKEN {
        Json(json!({ "token": SESSION_TOKEN, "user": user_json() })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid Google token" })),
        )
            .into_response()
    }
}

async fn google_callback(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let code = params.get("code").cloned().unwrap_or_default();
    backend.codes.lock().unwrap().push(code);
    Json(json!({
        "message": "Login successful",
        "data": { "token": SESSION_TOKEN, "user": user_json() }
    }))
    .into_response()
}

async fn list_projects(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    backend.authorization.lock().unwrap().push(authorization.clone());

    if authorization.as_deref() != Some("Bearer tok-1") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Token expired" })),
        )
            .into_response();
    }
    Json(json!({
        "message": "Projects retrieved",
        "data": [
            { "id": "cli", "title": "Build a CLI", "difficulty": "beginner", "tech_stack": ["rust"] },
            { "id": "kv", "title": "Key-value store", "difficulty": "advanced" }
        ]
    }))
    .into_response()
}

async fn create_project(Json(body): Json<Value>) -> Response {
    if body["title"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "title is required" })),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "id": body["id"], "title": body["title"], "tech_stack": body["technologies"] })),
    )
        .into_response()
}

async fn submit_project() -> Response {
    (StatusCode::OK, "Submission received").into_response()
}

async fn github_callback() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html")],
        "<html>linked</html>",
    )
        .into_response()
}

async fn collector_settings() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "collector unavailable").into_response()
}

async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/api/auth/google", post(google_login))
        .route("/api/auth/google/callback", get(google_callback))
        .route("/api/auth/github/callback", get(github_callback))
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/submit", post(submit_project))
        .route("/api/admin/settings/collector", post(collector_settings))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config(api_url: &str, storage: &TempDir) -> ClientConfig {
    ClientConfig {
        api_url: api_url.to_string(),
        storage_dir: storage.path().to_path_buf(),
        ..ClientConfig::default()
    }
}

fn stored(storage: &TempDir, key: &str) -> Option<String> {
    FileStorage::new(storage.path()).unwrap().get(key).unwrap()
}

#[tokio::test]
async fn test_login_persists_session_and_sends_bearer() {
    let backend = Backend::default();
    let url = spawn_backend(backend.clone()).await;
    let storage = TempDir::new().unwrap();
    let (notifier, mut notifications) = ChannelNotifier::new();
    let client = Client::connect(&config(&url, &storage), Arc::new(notifier)).unwrap();

    let auth = client.auth().login(GOOD_GOOGLE_TOKEN).await.unwrap();
    assert_eq!(auth.user.name, "Ada");
    assert_eq!(notifications.try_recv().unwrap().message, "Welcome back!");
    assert_eq!(stored(&storage, TOKEN_KEY).as_deref(), Some(SESSION_TOKEN));
    assert!(stored(&storage, USER_KEY).unwrap().contains("ada@example.com"));

    let projects = client.projects().fetch_projects().await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].tech_stack, vec!["rust"]);
    assert_eq!(
        backend.authorization.lock().unwrap().as_slice(),
        &[Some("Bearer tok-1".to_string())]
    );
}

#[tokio::test]
async fn test_session_survives_restart() {
    let url = spawn_backend(Backend::default()).await;
    let storage = TempDir::new().unwrap();

    {
        let client = Client::connect(&config(&url, &storage), Arc::new(NoopNotifier)).unwrap();
        client.auth().login(GOOD_GOOGLE_TOKEN).await.unwrap();
    }

    let client = Client::connect(&config(&url, &storage), Arc::new(NoopNotifier)).unwrap();
    assert!(client.auth().is_authenticated());
    client.projects().fetch_projects().await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_response_clears_session() {
    let backend = Backend::default();
    let url = spawn_backend(backend.clone()).await;
    let storage = TempDir::new().unwrap();
    {
        let seed = FileStorage::new(storage.path()).unwrap();
        seed.set(USER_KEY, &user_json().to_string()).unwrap();
        seed.set(TOKEN_KEY, "expired").unwrap();
    }
    let client = Client::connect(&config(&url, &storage), Arc::new(NoopNotifier)).unwrap();
    assert!(client.auth().is_authenticated());

    let error = client.projects().fetch_projects().await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Auth);
    assert_eq!(error.message(), "Token expired");
    assert_eq!(error.status(), Some(401));
    assert!(client.projects().projects().is_empty());
    assert!(!client.auth().is_authenticated());
    assert_eq!(stored(&storage, TOKEN_KEY), None);
    assert_eq!(stored(&storage, USER_KEY), None);
    assert_eq!(
        backend.authorization.lock().unwrap().as_slice(),
        &[Some("Bearer expired".to_string())]
    );
}

#[tokio::test]
async fn test_failed_login_is_auth_error() {
    let url = spawn_backend(Backend::default()).await;
    let storage = TempDir::new().unwrap();
    let client = Client::connect(&config(&url, &storage), Arc::new(NoopNotifier)).unwrap();

    let error = client.auth().login("forged").await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Auth);
    assert_eq!(error.details(), Some(&json!({ "message": "Invalid Google token" })));
    let snapshot = client.auth().snapshot();
    assert!(snapshot.data.is_none());
    assert!(!snapshot.is_loading);
    assert_eq!(stored(&storage, TOKEN_KEY), None);
}

#[tokio::test]
async fn test_callback_code_is_query_encoded() {
    let backend = Backend::default();
    let url = spawn_backend(backend.clone()).await;
    let storage = TempDir::new().unwrap();
    let client = Client::connect(&config(&url, &storage), Arc::new(NoopNotifier)).unwrap();

    client
        .auth()
        .handle_google_callback("4/0A&x=y z")
        .await
        .unwrap();

    assert_eq!(backend.codes.lock().unwrap().as_slice(), &["4/0A&x=y z".to_string()]);
    assert_eq!(client.auth().token().as_deref(), Some(SESSION_TOKEN));
}

#[tokio::test]
async fn test_validation_error_uses_error_field() {
    let url = spawn_backend(Backend::default()).await;
    let storage = TempDir::new().unwrap();
    let client = Client::connect(&config(&url, &storage), Arc::new(NoopNotifier)).unwrap();

    let error = client
        .projects()
        .create_project(&CreateProjectRequest {
            id: "empty".to_string(),
            title: String::new(),
            description: String::new(),
            difficulty: "beginner".to_string(),
            technologies: Vec::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(error.user_message(), "title is required");
    assert_eq!(error.details(), Some(&json!({ "error": "title is required" })));
}

#[tokio::test]
async fn test_create_and_submit() {
    let url = spawn_backend(Backend::default()).await;
    let storage = TempDir::new().unwrap();
    let client = Client::connect(&config(&url, &storage), Arc::new(NoopNotifier)).unwrap();

    let project = client
        .projects()
        .create_project(&CreateProjectRequest {
            id: "chat".to_string(),
            title: "Realtime chat".to_string(),
            description: "Websockets".to_string(),
            difficulty: "intermediate".to_string(),
            technologies: vec!["tokio".to_string()],
        })
        .await
        .unwrap();
    assert_eq!(project.tech_stack, vec!["tokio"]);

    client
        .projects()
        .submit_project(&SubmitProjectRequest {
            project_id: "chat".to_string(),
            github_repo_url: "https://github.com/ada/chat".to_string(),
            pr_url: None,
            demo_url: None,
        })
        .await
        .unwrap();
    assert_eq!(client.projects().projects().len(), 1);
}

#[tokio::test]
async fn test_text_success_bodies_resolve() {
    let url = spawn_backend(Backend::default()).await;
    let storage = TempDir::new().unwrap();
    let (notifier, mut notifications) = ChannelNotifier::new();
    let client = Client::connect(&config(&url, &storage), Arc::new(notifier)).unwrap();

    client.auth().link_github("gh-code").await.unwrap();
    assert!(client.auth().error().is_none());
    assert_eq!(notifications.try_recv().unwrap().message, "GitHub Linked!");

    client
        .projects()
        .submit_project(&SubmitProjectRequest {
            project_id: "chat".to_string(),
            github_repo_url: "https://github.com/ada/chat".to_string(),
            pr_url: None,
            demo_url: None,
        })
        .await
        .unwrap();
    assert!(client.projects().error().is_none());
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let url = spawn_backend(Backend::default()).await;
    let storage = TempDir::new().unwrap();
    let client = Client::connect(&config(&url, &storage), Arc::new(NoopNotifier)).unwrap();

    let error = client
        .admin()
        .update_collector_frequency(4)
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Api);
    assert_eq!(error.message(), "collector unavailable");
    assert_eq!(error.details().unwrap()["status"], 500);
    assert_eq!(error.user_message(), "Something went wrong. Please try again.");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let storage = TempDir::new().unwrap();
    let client = Client::connect(&config(&url, &storage), Arc::new(NoopNotifier)).unwrap();

    let error = client.projects().fetch_projects().await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Network);
    assert_eq!(error.status(), None);
    assert_eq!(
        error.user_message(),
        "Unable to connect. Please check your internet connection."
    );
}
