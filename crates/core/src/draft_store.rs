//! Persisted form drafts.
//!
//! Drafts are stored as a small JSON envelope carrying a format version and
//! the save time around the caller's payload. Every failure here is
//! swallowed: a draft that cannot be read is treated as absent, and a draft
//! that cannot be written stays in memory only.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::KeyValueStorage;
use crate::types::Timestamp;

/// Current envelope format. Payloads stored without an envelope predate
/// versioning and are read as-is.
pub const DRAFT_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    version: u32,
    saved_at: Timestamp,
    payload: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    payload: Value,
}

/// Load/save/clear named drafts on top of a [`KeyValueStorage`].
///
/// Cheap to clone; clones share the underlying storage.
#[derive(Clone)]
pub struct DraftStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl DraftStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read the draft stored under `key`.
    ///
    /// Returns `None` when nothing is stored, the storage fails, the value
    /// is not valid JSON, it was written by a newer format, or it does not
    /// fit `T`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Draft storage read failed; using defaults");
                return None;
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding corrupted draft");
                return None;
            }
        };

        let payload = if is_envelope(&value) {
            let envelope: EnvelopeIn = match serde_json::from_value(value) {
                Ok(envelope) => envelope,
                Err(e) => {
                    tracing::warn!(key, error = %e, "Discarding malformed draft envelope");
                    return None;
                }
            };
            if envelope.version > DRAFT_FORMAT_VERSION {
                tracing::warn!(
                    key,
                    version = envelope.version,
                    supported = DRAFT_FORMAT_VERSION,
                    "Discarding draft written by a newer format"
                );
                return None;
            }
            envelope.payload
        } else {
            tracing::debug!(key, "Migrating unversioned draft");
            value
        };

        match serde_json::from_value(payload) {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding incompatible draft");
                None
            }
        }
    }

    /// Persist `draft` under `key`. Failures are logged and ignored.
    pub fn save<T: Serialize>(&self, key: &str, draft: &T) {
        let envelope = EnvelopeOut {
            version: DRAFT_FORMAT_VERSION,
            saved_at: chrono::Utc::now(),
            payload: draft,
        };

        let serialized = match serde_json::to_string(&envelope) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!(key, error = %e, "Draft serialization failed; not saved");
                return;
            }
        };

        if let Err(e) = self.storage.set(key, &serialized) {
            tracing::warn!(key, error = %e, "Draft save failed; progress kept in memory only");
        }
    }

    /// Remove the draft stored under `key`. Failures are logged and ignored.
    pub fn clear(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            tracing::warn!(key, error = %e, "Draft clear failed");
        }
    }
}

fn is_envelope(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        obj.len() <= 3
            && obj.get("version").is_some_and(Value::is_u64)
            && obj.contains_key("payload")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryStorage, StorageError};
    use serde_json::json;

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
    }

    fn memory_store() -> (Arc<InMemoryStorage>, DraftStore) {
        let storage = Arc::new(InMemoryStorage::new());
        let store = DraftStore::new(storage.clone());
        (storage, store)
    }

    #[test]
    fn save_then_load_returns_same_draft() {
        let (_, store) = memory_store();
        let draft = json!({
            "general": { "given_name": "Ana", "truthful": true },
            "student": { "subjects": ["Historia", "Química"] }
        });

        store.save("intake", &draft);
        assert_eq!(store.load::<Value>("intake"), Some(draft));
    }

    #[test]
    fn missing_draft_is_none() {
        let (_, store) = memory_store();
        assert_eq!(store.load::<Value>("nothing"), None);
    }

    #[test]
    fn corrupted_draft_is_none() {
        let (storage, store) = memory_store();
        storage.set("intake", "{ not json").unwrap();
        assert_eq!(store.load::<Value>("intake"), None);
    }

    #[test]
    fn payload_of_wrong_shape_is_none() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Typed {
            step: u8,
        }

        let (_, store) = memory_store();
        store.save("intake", &json!({ "step": "three" }));
        assert!(store.load::<Typed>("intake").is_none());
    }

    #[test]
    fn newer_format_is_discarded() {
        let (storage, store) = memory_store();
        let future = json!({ "version": DRAFT_FORMAT_VERSION + 1, "payload": { "a": 1 } });
        storage.set("intake", &future.to_string()).unwrap();
        assert_eq!(store.load::<Value>("intake"), None);
    }

    #[test]
    fn unversioned_draft_is_migrated() {
        let (storage, store) = memory_store();
        let legacy = json!({ "general": { "given_name": "Ana" }, "lastSaved": "2025-01-01T00:00:00Z" });
        storage.set("intake", &legacy.to_string()).unwrap();
        assert_eq!(store.load::<Value>("intake"), Some(legacy));
    }

    #[test]
    fn stored_value_is_versioned() {
        let (storage, store) = memory_store();
        store.save("intake", &json!({ "a": "b" }));

        let raw: Value = serde_json::from_str(&storage.get("intake").unwrap().unwrap()).unwrap();
        assert_eq!(raw["version"], DRAFT_FORMAT_VERSION);
        assert_eq!(raw["payload"], json!({ "a": "b" }));
        assert!(raw["saved_at"].is_string());
    }

    #[test]
    fn clear_removes_draft() {
        let (storage, store) = memory_store();
        store.save("intake", &json!({}));
        store.clear("intake");
        assert!(storage.is_empty());
        assert_eq!(store.load::<Value>("intake"), None);
    }

    #[test]
    fn broken_storage_never_fails_callers() {
        let store = DraftStore::new(Arc::new(BrokenStorage));
        store.save("intake", &json!({ "a": 1 }));
        store.clear("intake");
        assert_eq!(store.load::<Value>("intake"), None);
    }
}
