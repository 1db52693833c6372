//! Route definitions for the access gate.
//!
//! ```text
//! GET    /access?path=...               check_access
//! GET    /landing                       landing
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::access;
use crate::state::AppState;

/// Access gate routes -- merged at the `/api/v1` root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/access", get(access::check_access))
        .route("/landing", get(access::landing))
}
