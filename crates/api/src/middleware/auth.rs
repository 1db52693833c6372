//! JWT-based identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use eduplan_core::identity::IdentityState;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The principal behind the request, or [`IdentityState::SignedOut`] when
/// the `Authorization` header is missing, malformed, or carries a token
/// that does not verify.
///
/// Never rejects; the access gate decides what a signed-out principal may
/// see.
///
/// ```ignore
/// async fn my_handler(MaybeIdentity(identity): MaybeIdentity) -> AppResult<Json<()>> {
///     tracing::info!(signed_in = identity.identity().is_some(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub IdentityState);

impl FromRequestParts<AppState> for MaybeIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        else {
            return Ok(MaybeIdentity(IdentityState::SignedOut));
        };

        let Some(token) = auth_header.strip_prefix("Bearer ") else {
            tracing::debug!("Authorization header is not a Bearer token");
            return Ok(MaybeIdentity(IdentityState::SignedOut));
        };

        match validate_token(token, &state.config.jwt) {
            Ok(claims) => Ok(MaybeIdentity(IdentityState::SignedIn(claims.into_identity()))),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected access token");
                Ok(MaybeIdentity(IdentityState::SignedOut))
            }
        }
    }
}
