use std::collections::BTreeSet;

use tokio::sync::Mutex;
use tracing::{info, warn};

use super::storage::CaughtStorage;
use crate::error::CritterResult;

/// Names of caught creatures. Ordered so the persisted array is deterministic.
pub type CaughtSet = BTreeSet<String>;

/// Caught-state owned by one session.
///
/// The set lives behind an async mutex that stays locked for the whole
/// update-and-persist sequence, so concurrent toggles are applied and
/// written one after another.
pub struct CaughtStore {
    storage: Box<dyn CaughtStorage>,
    caught: Mutex<CaughtSet>,
}

impl CaughtStore {
    /// Read the persisted set. Missing or unreadable storage yields an empty set.
    pub async fn load(storage: impl CaughtStorage + 'static) -> Self {
        let caught = match storage.read().await {
            Ok(Some(content)) => match serde_json::from_str::<Vec<String>>(&content) {
                Ok(names) => names.into_iter().collect(),
                Err(e) => {
                    warn!("Caught state is corrupt, starting empty: {}", e);
                    CaughtSet::new()
                }
            },
            Ok(None) => CaughtSet::new(),
            Err(e) => {
                warn!("Failed to read caught state, starting empty: {}", e);
                CaughtSet::new()
            }
        };

        info!("Loaded {} caught creatures", caught.len());
        Self {
            storage: Box::new(storage),
            caught: Mutex::new(caught),
        }
    }

    /// Mark `name` caught or not and persist the full set.
    ///
    /// On a storage failure the in-memory set is left unchanged.
    pub async fn toggle(&self, name: &str, caught: bool) -> CritterResult<CaughtSet> {
        let mut guard = self.caught.lock().await;

        let mut next = guard.clone();
        let changed = if caught {
            next.insert(name.to_string())
        } else {
            next.remove(name)
        };

        if changed {
            self.persist(&next).await?;
            *guard = next;
            info!("{} {}", if caught { "Caught" } else { "Released" }, name);
        }

        Ok(guard.clone())
    }

    pub async fn is_caught(&self, name: &str) -> bool {
        self.caught.lock().await.contains(name)
    }

    pub async fn snapshot(&self) -> CaughtSet {
        self.caught.lock().await.clone()
    }

    /// Forget everything. Only reachable through an explicit user action.
    pub async fn clear(&self) -> CritterResult<usize> {
        let mut guard = self.caught.lock().await;
        let cleared = guard.len();
        self.persist(&CaughtSet::new()).await?;
        guard.clear();
        info!("Cleared {} caught creatures", cleared);
        Ok(cleared)
    }

    async fn persist(&self, set: &CaughtSet) -> CritterResult<()> {
        let names: Vec<&String> = set.iter().collect();
        let content = serde_json::to_string(&names)?;
        self.storage.write(&content).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::CritterError;
    use crate::module::caught::MemoryStorage;
    use async_trait::async_trait;

    /// Shares one memory entry between a store and the test
    struct SharedStorage(Arc<MemoryStorage>);

    #[async_trait]
    impl CaughtStorage for SharedStorage {
        async fn read(&self) -> CritterResult<Option<String>> {
            self.0.read().await
        }

        async fn write(&self, content: &str) -> CritterResult<()> {
            self.0.write(content).await
        }
    }

    struct FailingWrites;

    #[async_trait]
    impl CaughtStorage for FailingWrites {
        async fn read(&self) -> CritterResult<Option<String>> {
            Ok(Some(r#"["Koi"]"#.to_string()))
        }

        async fn write(&self, _content: &str) -> CritterResult<()> {
            Err(CritterError::io(
                "caught.json",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
    }

    #[tokio::test]
    async fn test_load_existing() {
        let store = CaughtStore::load(MemoryStorage::with_content(r#"["Koi","Carp"]"#)).await;
        assert!(store.is_caught("Koi").await);
        assert!(store.is_caught("Carp").await);
        assert!(!store.is_caught("Tuna").await);
    }

    #[tokio::test]
    async fn test_corrupt_storage_is_empty() {
        let store = CaughtStore::load(MemoryStorage::with_content("{not json")).await;
        assert!(store.snapshot().await.is_empty());

        let store = CaughtStore::load(MemoryStorage::new()).await;
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_persists_every_change() {
        let memory = Arc::new(MemoryStorage::new());
        let store = CaughtStore::load(SharedStorage(memory.clone())).await;

        store.toggle("Koi", true).await.unwrap();
        assert_eq!(memory.content().await.as_deref(), Some(r#"["Koi"]"#));

        store.toggle("Carp", true).await.unwrap();
        assert_eq!(memory.content().await.as_deref(), Some(r#"["Carp","Koi"]"#));
    }

    #[tokio::test]
    async fn test_toggle_round_trip_restores_persisted_set() {
        let original = r#"["Carp","Koi"]"#;
        let memory = Arc::new(MemoryStorage::with_content(original));
        let store = CaughtStore::load(SharedStorage(memory.clone())).await;
        let before = store.snapshot().await;

        store.toggle("Tarantula", true).await.unwrap();
        assert!(store.is_caught("Tarantula").await);
        let after = store.toggle("Tarantula", false).await.unwrap();

        assert_eq!(after, before);
        assert_eq!(memory.content().await.as_deref(), Some(original));
    }

    #[tokio::test]
    async fn test_concurrent_toggles_all_land() {
        let memory = Arc::new(MemoryStorage::new());
        let store = Arc::new(CaughtStore::load(SharedStorage(memory.clone())).await);

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.toggle(&format!("Fish {i:02}"), true).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.snapshot().await.len(), 20);
        let persisted: Vec<String> = serde_json::from_str(&memory.content().await.unwrap()).unwrap();
        assert_eq!(persisted.len(), 20);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_state() {
        let store = CaughtStore::load(FailingWrites).await;
        assert!(store.toggle("Carp", true).await.is_err());
        assert!(!store.is_caught("Carp").await);
        assert!(store.is_caught("Koi").await);
        assert!(store.clear().await.is_err());
        assert!(store.is_caught("Koi").await);
    }

    #[tokio::test]
    async fn test_clear() {
        let memory = Arc::new(MemoryStorage::with_content(r#"["Koi"]"#));
        let store = CaughtStore::load(SharedStorage(memory.clone())).await;
        assert_eq!(store.clear().await.unwrap(), 1);
        assert!(store.snapshot().await.is_empty());
        assert_eq!(memory.content().await.as_deref(), Some("[]"));
    }
}
