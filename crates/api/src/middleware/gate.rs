//! Access gate applied to intake endpoints.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use eduplan_core::access::AccessDecision;
use eduplan_core::error::CoreError;
use eduplan_core::identity::{Identity, IdentityState};
use eduplan_core::intake::IntakeKind;

use super::auth::MaybeIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// A signed-in principal admitted to the intake named by the `{kind}` path
/// segment.
///
/// The request is gated as a navigation to the portal page hosting the
/// intake, so the route table's allow-list applies unchanged.
///
/// ```ignore
/// async fn get_draft(access: IntakeAccess) -> AppResult<Json<()>> {
///     tracing::info!(intake = %access.kind, owner = %access.identity.id, "draft requested");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct IntakeAccess {
    pub kind: IntakeKind,
    pub identity: Identity,
}

impl FromRequestParts<AppState> for IntakeAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let kind = params
            .get("kind")
            .ok_or_else(|| AppError::BadRequest("Missing intake kind".into()))
            .and_then(|kind| IntakeKind::parse(kind).map_err(AppError::from))?;

        let MaybeIdentity(identity) = MaybeIdentity::from_request_parts(parts, state).await?;

        let path = kind.hosting_path();
        let decision = state.routes.authorize(&identity, path).ok_or_else(|| {
            AppError::InternalError(format!("No route rule for intake page {path}"))
        })?;
        tracing::debug!(intake = %kind, path, ?decision, "Intake access decision");

        enforce(decision, path)?;

        match identity {
            IdentityState::SignedIn(identity) => Ok(IntakeAccess { kind, identity }),
            _ => Err(CoreError::Unauthorized("Sign in required".into()).into()),
        }
    }
}

/// Turn a gate decision into a handler error unless it allows access.
pub fn enforce(decision: AccessDecision, path: &str) -> Result<(), CoreError> {
    match decision {
        AccessDecision::Allowed => Ok(()),
        AccessDecision::Pending | AccessDecision::Unauthenticated => {
            Err(CoreError::Unauthorized("Sign in required".into()))
        }
        AccessDecision::NeedsOnboarding => Err(CoreError::OnboardingRequired(path.to_string())),
        AccessDecision::Forbidden(role) => Err(CoreError::Forbidden(role)),
    }
}
