//! Repository for the `intake_submissions` table.

use eduplan_core::submission::SubmissionRecord;
use sqlx::PgPool;

use crate::models::submission::IntakeSubmission;

/// Column list for `intake_submissions` queries.
const COLUMNS: &str = "id, intake, submitted_by, sections, completed, registered_at, created_at";

/// Write access to finalized questionnaires.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a finalized questionnaire, returning the stored row.
    pub async fn create(
        pool: &PgPool,
        record: &SubmissionRecord,
    ) -> Result<IntakeSubmission, sqlx::Error> {
        let query = format!(
            "INSERT INTO intake_submissions (id, intake, submitted_by, sections, completed, registered_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IntakeSubmission>(&query)
            .bind(record.id)
            .bind(record.intake.as_str())
            .bind(&record.submitted_by)
            .bind(serde_json::Value::Object(record.sections.clone()))
            .bind(record.completed)
            .bind(record.registered_at)
            .fetch_one(pool)
            .await
    }
}
