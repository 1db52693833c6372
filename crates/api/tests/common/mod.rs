#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use eduplan_core::draft_store::DraftStore;
use eduplan_core::identity::Identity;
use eduplan_core::roles::Role;
use eduplan_core::storage::{InMemoryStorage, KeyValueStorage};
use eduplan_core::submission::{InMemorySubmissionSink, SubmissionSink};
use http_body_util::BodyExt;
use tower::ServiceExt;

use eduplan_api::auth::jwt::{generate_access_token, JwtConfig};
use eduplan_api::config::ServerConfig;
use eduplan_api::router::build_app_router;
use eduplan_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        draft_dir: PathBuf::from("unused"),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// A router wired to in-memory doubles, plus handles on those doubles.
pub struct TestApp {
    pub router: Router,
    pub storage: Arc<InMemoryStorage>,
    pub sink: Arc<InMemorySubmissionSink>,
}

/// Build the full application router backed by in-memory storage and an
/// in-memory submission sink.
pub fn build_test_app() -> TestApp {
    let storage = Arc::new(InMemoryStorage::new());
    let sink = Arc::new(InMemorySubmissionSink::new());
    let router = build_app_with(storage.clone(), sink.clone());
    TestApp {
        router,
        storage,
        sink,
    }
}

/// Build the router over the given storage and sink.
pub fn build_app_with(
    storage: Arc<dyn KeyValueStorage>,
    sink: Arc<dyn SubmissionSink>,
) -> Router {
    let config = test_config();
    let state = AppState::new(config.clone(), DraftStore::new(storage), sink);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// A principal with a complete profile.
pub fn onboarded(id: &str, role: Role) -> Identity {
    Identity {
        school_id: Some("sec-12".into()),
        school_name: Some("Secundaria Técnica 12".into()),
        given_name: Some("Marta".into()),
        paternal_surname: Some("Ruiz".into()),
        ..Identity::new(id, role)
    }
}

/// Bearer token for `identity`, signed with the test secret.
pub fn token_for(identity: &Identity) -> String {
    generate_access_token(identity, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::POST, uri, token, None).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::DELETE, uri, token, None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
