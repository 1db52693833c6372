//! Route definitions for the intake questionnaires.
//!
//! Mounted at `/intakes` by `api_routes()`. `{kind}` is `student-profile`
//! or `socioeducational`.
//!
//! ```text
//! GET    /{kind}/draft                        get_draft
//! DELETE /{kind}/draft                        discard
//! PUT    /{kind}/draft/sections/{section}     update_section
//! POST   /{kind}/draft/next                   next_step
//! POST   /{kind}/draft/prev                   prev_step
//! POST   /{kind}/draft/finalize               finalize
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::intake;
use crate::state::AppState;

/// Intake routes -- mounted at `/intakes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{kind}/draft",
            get(intake::get_draft).delete(intake::discard),
        )
        .route(
            "/{kind}/draft/sections/{section}",
            put(intake::update_section),
        )
        .route("/{kind}/draft/next", post(intake::next_step))
        .route("/{kind}/draft/prev", post(intake::prev_step))
        .route("/{kind}/draft/finalize", post(intake::finalize))
}
