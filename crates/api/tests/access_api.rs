//! Integration tests for the access gate endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, onboarded, token_for};
use eduplan_core::identity::Identity;
use eduplan_core::roles::Role;

async fn access(path: &str, token: Option<&str>) -> serde_json::Value {
    let app = build_test_app();
    let response = get(&app.router, &format!("/api/v1/access?path={path}"), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// GET /api/v1/access
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_request_redirects_to_login() {
    let data = access("/teacher/dashboard", None).await;
    assert_eq!(data["decision"], "unauthenticated");
    assert_eq!(data["redirect"], "/login");
    assert_eq!(data["known_route"], true);
}

#[tokio::test]
async fn invalid_token_counts_as_signed_out() {
    let data = access("/teacher/dashboard", Some("not-a-jwt")).await;
    assert_eq!(data["decision"], "unauthenticated");
}

#[tokio::test]
async fn public_path_is_allowed_without_identity() {
    let data = access("/login", None).await;
    assert_eq!(data["decision"], "allowed");
    assert!(data.get("redirect").is_none());
}

#[tokio::test]
async fn teacher_without_school_needs_onboarding() {
    let identity = Identity {
        school_id: None,
        ..onboarded("teacher-1", Role::Teacher)
    };
    let data = access("/teacher/dashboard", Some(&token_for(&identity))).await;
    assert_eq!(data["decision"], "needs_onboarding");
    assert_eq!(data["redirect"], "/onboarding");
}

#[tokio::test]
async fn onboarding_page_never_loops() {
    let identity = Identity::new("teacher-2", Role::Teacher);
    let data = access("/onboarding", Some(&token_for(&identity))).await;
    assert_eq!(data["decision"], "allowed");
}

#[tokio::test]
async fn student_on_teacher_route_is_forbidden() {
    let token = token_for(&onboarded("student-1", Role::Student));
    let data = access("/teacher/tools", Some(&token)).await;
    assert_eq!(data["decision"], "forbidden");
    assert_eq!(data["role"], "student");
    assert!(data.get("redirect").is_none());
}

#[tokio::test]
async fn parameterised_route_matches() {
    let token = token_for(&onboarded("teacher-3", Role::Teacher));
    let data = access("/teacher/curriculum-guide/math-2", Some(&token)).await;
    assert_eq!(data["decision"], "allowed");
}

#[tokio::test]
async fn unknown_path_redirects_to_root() {
    let token = token_for(&onboarded("teacher-3", Role::Teacher));
    let data = access("/nowhere/at/all", Some(&token)).await;
    assert_eq!(data["known_route"], false);
    assert_eq!(data["redirect"], "/");
    assert!(data.get("decision").is_none());
}

#[tokio::test]
async fn relative_path_is_rejected() {
    let app = build_test_app();
    let response = get(&app.router, "/api/v1/access?path=teacher", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// GET /api/v1/landing
// ---------------------------------------------------------------------------

async fn landing(token: Option<&str>) -> serde_json::Value {
    let app = build_test_app();
    let response = get(&app.router, "/api/v1/landing", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

#[tokio::test]
async fn landing_sends_anonymous_to_login() {
    let data = landing(None).await;
    assert_eq!(data["decision"], "redirect");
    assert_eq!(data["redirect"], "/login");
}

#[tokio::test]
async fn landing_sends_each_role_to_its_dashboard() {
    for (role, path) in [
        (Role::SuperAdmin, "/admin/dashboard"),
        (Role::Director, "/director/dashboard"),
        (Role::Teacher, "/teacher/dashboard"),
        (Role::Student, "/student/dashboard"),
    ] {
        let token = token_for(&onboarded("someone", role));
        assert_eq!(landing(Some(&token)).await["redirect"], path);
    }
}

#[tokio::test]
async fn landing_exempts_superadmin_from_onboarding() {
    let token = token_for(&Identity::new("root", Role::SuperAdmin));
    assert_eq!(landing(Some(&token)).await["redirect"], "/admin/dashboard");

    let token = token_for(&Identity::new("student-8", Role::Student));
    assert_eq!(landing(Some(&token)).await["redirect"], "/onboarding");
}
