use std::collections::HashMap;
use std::sync::Arc;

use eduplan_core::draft_store::DraftStore;
use eduplan_core::routes::RouteTable;
use eduplan_core::submission::SubmissionSink;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (JWT settings are read by the identity extractor).
    pub config: Arc<ServerConfig>,
    /// Portal route table consulted by the access gate.
    pub routes: Arc<RouteTable>,
    /// Persisted questionnaire drafts.
    pub drafts: DraftStore,
    /// Write path for finalized questionnaires.
    pub submissions: Arc<dyn SubmissionSink>,
    /// One writer per draft key.
    pub draft_locks: Arc<DraftLocks>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        drafts: DraftStore,
        submissions: Arc<dyn SubmissionSink>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            routes: Arc::new(RouteTable::portal()),
            drafts,
            submissions,
            draft_locks: Arc::new(DraftLocks::default()),
        }
    }
}

/// Per-draft locks, so a read-modify-write on one draft never waits on
/// another principal's request.
///
/// Entries nobody holds or waits on are dropped on the next acquire.
#[derive(Default)]
pub struct DraftLocks {
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DraftLocks {
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut inflight = self.inflight.lock().await;
            inflight.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(
                inflight
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_key_is_serialized() {
        let locks = DraftLocks::default();
        let _held = locks.acquire("socio:student-1").await;
        let waiting = tokio::time::timeout(Duration::from_millis(50), locks.acquire("socio:student-1")).await;
        assert!(waiting.is_err());
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = DraftLocks::default();
        let _held = locks.acquire("socio:student-1").await;
        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire("socio:student-2")).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn released_keys_are_evicted() {
        let locks = DraftLocks::default();
        drop(locks.acquire("socio:student-1").await);
        drop(locks.acquire("socio:student-2").await);
        let _held = locks.acquire("socio:student-3").await;
        assert_eq!(locks.inflight.lock().await.len(), 1);
    }
}
