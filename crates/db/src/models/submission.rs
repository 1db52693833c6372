//! Intake submission entity model.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;
use eduplan_core::types::Timestamp;

/// A row from the `intake_submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IntakeSubmission {
    pub id: Uuid,
    /// Intake kind in its kebab-case string form.
    pub intake: String,
    pub submitted_by: String,
    pub sections: serde_json::Value,
    pub completed: Option<bool>,
    pub registered_at: Timestamp,
    pub created_at: Timestamp,
}
