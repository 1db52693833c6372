//! Finalized questionnaire records and the sink that persists them.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::CoreError;
use crate::intake::IntakeKind;
use crate::types::{PrincipalId, Timestamp};

/// Immutable result of finishing a questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub intake: IntakeKind,
    pub submitted_by: PrincipalId,
    pub sections: Map<String, Value>,
    pub registered_at: Timestamp,
    /// Required-field verdict, for questionnaires that define one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// What the caller gets back after a successful finalize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub id: Uuid,
    /// Identifier assigned by the sink.
    pub stored_id: String,
    pub registered_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Remote write path for finalized questionnaires.
///
/// Implementations own retry policy; callers make exactly one attempt.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Persist `record` and return the identifier it was stored under.
    async fn persist(&self, record: SubmissionRecord) -> Result<String, CoreError>;

    async fn is_healthy(&self) -> bool {
        true
    }
}

/// Keeps submissions in memory. Used by tests and local runs.
#[derive(Debug, Default)]
pub struct InMemorySubmissionSink {
    records: Mutex<Vec<SubmissionRecord>>,
}

impl InMemorySubmissionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SubmissionRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SubmissionSink for InMemorySubmissionSink {
    async fn persist(&self, record: SubmissionRecord) -> Result<String, CoreError> {
        let stored_id = record.id.to_string();
        self.records
            .lock()
            .map_err(|_| CoreError::Internal("submission store lock poisoned".into()))?
            .push(record);
        Ok(stored_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_sink_keeps_records() {
        let sink = InMemorySubmissionSink::new();
        let record = SubmissionRecord {
            id: Uuid::now_v7(),
            intake: IntakeKind::Socioeducational,
            submitted_by: "student-9".into(),
            sections: Map::new(),
            registered_at: chrono::Utc::now(),
            completed: Some(false),
        };

        let stored_id = sink.persist(record.clone()).await.unwrap();
        assert_eq!(stored_id, record.id.to_string());
        assert_eq!(sink.records(), vec![record]);
        assert!(sink.is_healthy().await);
    }

    #[test]
    fn record_omits_absent_completed_flag() {
        let record = SubmissionRecord {
            id: Uuid::now_v7(),
            intake: IntakeKind::StudentProfile,
            submitted_by: "teacher-1".into(),
            sections: Map::new(),
            registered_at: chrono::Utc::now(),
            completed: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("completed").is_none());
        assert_eq!(json["intake"], "student-profile");
    }
}
