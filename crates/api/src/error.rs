use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eduplan_core::access::{LOGIN_PATH, ONBOARDING_PATH};
use eduplan_core::error::CoreError;
use eduplan_core::roles::Role;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `eduplan_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut redirect: Option<&'static str> = None;
        let mut role: Option<Role> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    redirect = Some(LOGIN_PATH);
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::OnboardingRequired(_) => {
                    redirect = Some(ONBOARDING_PATH);
                    (StatusCode::FORBIDDEN, "NEEDS_ONBOARDING", core.to_string())
                }
                CoreError::Forbidden(denied) => {
                    role = Some(*denied);
                    (StatusCode::FORBIDDEN, "FORBIDDEN", core.to_string())
                }
                CoreError::SubmissionFailed(msg) => {
                    tracing::warn!(error = %msg, "Submission sink rejected record");
                    (
                        StatusCode::BAD_GATEWAY,
                        "SUBMISSION_FAILED",
                        "Saving the questionnaire failed; your progress was kept".to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(target) = redirect {
            body["redirect"] = json!(target);
        }
        if let Some(role) = role {
            body["role"] = json!(role);
        }

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_points_to_login() {
        let (status, body) =
            render(CoreError::Unauthorized("Sign in required".into()).into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["redirect"], "/login");
    }

    #[tokio::test]
    async fn forbidden_carries_role() {
        let (status, body) = render(CoreError::Forbidden(Role::Student).into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
        assert_eq!(body["role"], "student");
        assert!(body.get("redirect").is_none());
    }

    #[tokio::test]
    async fn submission_failure_is_bad_gateway() {
        let (status, body) =
            render(CoreError::SubmissionFailed("connection refused".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "SUBMISSION_FAILED");
    }
}
