//! Handlers exposing the access gate to the portal front end.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use eduplan_core::access::{self, AccessDecision, ROOT_PATH};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeIdentity;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AccessParams {
    /// Portal path the principal is navigating to.
    pub path: String,
}

/// Gate outcome for one portal path.
///
/// `decision` is absent for paths the route table does not know; those
/// redirect to the portal root.
#[derive(Debug, Serialize)]
pub struct AccessView {
    pub path: String,
    pub known_route: bool,
    #[serde(flatten)]
    pub decision: Option<AccessDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

// ---------------------------------------------------------------------------
// GET /access?path=...
// ---------------------------------------------------------------------------

/// Decide whether the caller may open `path`.
pub async fn check_access(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Query(params): Query<AccessParams>,
) -> AppResult<impl IntoResponse> {
    if !params.path.starts_with('/') {
        return Err(AppError::BadRequest(format!(
            "Path must be absolute, got '{}'",
            params.path
        )));
    }

    let view = match state.routes.authorize(&identity, &params.path) {
        Some(decision) => AccessView {
            known_route: true,
            redirect: decision.redirect_target(),
            decision: Some(decision),
            path: params.path,
        },
        None => AccessView {
            known_route: false,
            redirect: Some(ROOT_PATH),
            decision: None,
            path: params.path,
        },
    };

    tracing::debug!(
        path = %view.path,
        decision = ?view.decision,
        principal = identity.identity().map(|i| i.id.as_str()),
        "Access decision"
    );

    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// GET /landing
// ---------------------------------------------------------------------------

/// Where the portal root sends the caller.
pub async fn landing(MaybeIdentity(identity): MaybeIdentity) -> AppResult<impl IntoResponse> {
    let decision = access::decide_landing(&identity);
    Ok(Json(DataResponse { data: decision }))
}
