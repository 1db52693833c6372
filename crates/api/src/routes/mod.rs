pub mod access;
pub mod health;
pub mod intake;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /access?path=...                                 gate decision for a portal path
/// /landing                                         root redirect target
///
/// /intakes/{kind}/draft                            get, discard
/// /intakes/{kind}/draft/sections/{section}         update section
/// /intakes/{kind}/draft/next                       next step
/// /intakes/{kind}/draft/prev                       previous step
/// /intakes/{kind}/draft/finalize                   submit
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(access::router())
        .nest("/intakes", intake::router())
}
