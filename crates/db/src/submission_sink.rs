//! Postgres-backed [`SubmissionSink`].

use async_trait::async_trait;
use eduplan_core::error::CoreError;
use eduplan_core::submission::{SubmissionRecord, SubmissionSink};

use crate::repositories::SubmissionRepo;
use crate::DbPool;

/// Writes finalized questionnaires to `intake_submissions`.
#[derive(Clone)]
pub struct PgSubmissionSink {
    pool: DbPool,
}

impl PgSubmissionSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionSink for PgSubmissionSink {
    async fn persist(&self, record: SubmissionRecord) -> Result<String, CoreError> {
        let row = SubmissionRepo::create(&self.pool, &record)
            .await
            .map_err(|e| {
                tracing::error!(submission_id = %record.id, error = %e, "Failed to store submission");
                CoreError::SubmissionFailed(e.to_string())
            })?;
        Ok(row.id.to_string())
    }

    async fn is_healthy(&self) -> bool {
        crate::health_check(&self.pool).await.is_ok()
    }
}
