//! Handlers for the resumable intake questionnaires.
//!
//! Every handler opens the caller's wizard from the draft store, applies
//! one operation, and lets the wizard persist the result. The caller's
//! draft lock is held for the whole read-modify-write; other drafts are
//! never blocked by it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use eduplan_core::wizard::WizardController;
use serde_json::{Map, Value};

use crate::error::AppResult;
use crate::middleware::gate::IntakeAccess;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn draft_key(access: &IntakeAccess) -> String {
    WizardController::draft_key(access.kind.schema(), &access.identity.id)
}

fn open_wizard(state: &AppState, access: &IntakeAccess) -> WizardController {
    WizardController::open(access.kind.schema(), state.drafts.clone(), &access.identity.id)
}

// ---------------------------------------------------------------------------
// GET /intakes/{kind}/draft
// ---------------------------------------------------------------------------

/// Current draft, step and progress. Starts from defaults when there is no
/// saved draft.
pub async fn get_draft(
    State(state): State<AppState>,
    access: IntakeAccess,
) -> AppResult<impl IntoResponse> {
    let _guard = state.draft_locks.acquire(&draft_key(&access)).await;
    let wizard = open_wizard(&state, &access);
    Ok(Json(DataResponse {
        data: wizard.snapshot(),
    }))
}

// ---------------------------------------------------------------------------
// PUT /intakes/{kind}/draft/sections/{section}
// ---------------------------------------------------------------------------

/// Merge the given fields into one section.
pub async fn update_section(
    State(state): State<AppState>,
    access: IntakeAccess,
    Path((_kind, section)): Path<(String, String)>,
    Json(fields): Json<Map<String, Value>>,
) -> AppResult<impl IntoResponse> {
    let _guard = state.draft_locks.acquire(&draft_key(&access)).await;
    let mut wizard = open_wizard(&state, &access);
    let field_count = fields.len();
    wizard.update_section(&section, fields)?;

    tracing::debug!(
        intake = %access.kind,
        owner = %access.identity.id,
        section = %section,
        field_count,
        "Draft section updated"
    );

    Ok(Json(DataResponse {
        data: wizard.snapshot(),
    }))
}

// ---------------------------------------------------------------------------
// POST /intakes/{kind}/draft/next
// ---------------------------------------------------------------------------

pub async fn next_step(
    State(state): State<AppState>,
    access: IntakeAccess,
) -> AppResult<impl IntoResponse> {
    let _guard = state.draft_locks.acquire(&draft_key(&access)).await;
    let mut wizard = open_wizard(&state, &access);
    wizard.next();
    Ok(Json(DataResponse {
        data: wizard.snapshot(),
    }))
}

// ---------------------------------------------------------------------------
// POST /intakes/{kind}/draft/prev
// ---------------------------------------------------------------------------

pub async fn prev_step(
    State(state): State<AppState>,
    access: IntakeAccess,
) -> AppResult<impl IntoResponse> {
    let _guard = state.draft_locks.acquire(&draft_key(&access)).await;
    let mut wizard = open_wizard(&state, &access);
    wizard.prev();
    Ok(Json(DataResponse {
        data: wizard.snapshot(),
    }))
}

// ---------------------------------------------------------------------------
// POST /intakes/{kind}/draft/finalize
// ---------------------------------------------------------------------------

/// Submit the questionnaire. Only allowed from the last step.
///
/// A sink failure surfaces as 502 and leaves the draft in place.
pub async fn finalize(
    State(state): State<AppState>,
    access: IntakeAccess,
) -> AppResult<impl IntoResponse> {
    let _guard = state.draft_locks.acquire(&draft_key(&access)).await;
    let mut wizard = open_wizard(&state, &access);
    let receipt = wizard.finalize(state.submissions.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

// ---------------------------------------------------------------------------
// DELETE /intakes/{kind}/draft
// ---------------------------------------------------------------------------

/// Throw away the caller's progress.
pub async fn discard(
    State(state): State<AppState>,
    access: IntakeAccess,
) -> AppResult<impl IntoResponse> {
    let _guard = state.draft_locks.acquire(&draft_key(&access)).await;
    let mut wizard = open_wizard(&state, &access);
    wizard.discard();
    Ok(StatusCode::NO_CONTENT)
}
