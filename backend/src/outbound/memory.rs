//! In-memory tracked-content repository.
//!
//! Records are held in their versioned binary encoding so every save and
//! load exercises the durable format, exactly as an external store would.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::codec::binary;
use crate::domain::ports::{TrackedContentRepository, TrackedContentRepositoryError};
use crate::domain::{TrackedContent, TrackingKey};

/// Repository adapter keeping encoded records in process memory.
#[derive(Debug, Default)]
pub struct InMemoryTrackedContentRepository {
    records: RwLock<HashMap<TrackingKey, Vec<u8>>>,
}

impl InMemoryTrackedContentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TrackedContentRepository for InMemoryTrackedContentRepository {
    async fn save(&self, content: &TrackedContent) -> Result<(), TrackedContentRepositoryError> {
        let bytes = binary::encode(content)?;
        debug!(
            tracking_id = %content.key(),
            bytes = bytes.len(),
            "storing tracked content"
        );
        self.records
            .write()
            .await
            .insert(content.key().clone(), bytes);
        Ok(())
    }

    async fn load(
        &self,
        key: &TrackingKey,
    ) -> Result<Option<TrackedContent>, TrackedContentRepositoryError> {
        let records = self.records.read().await;
        let Some(bytes) = records.get(key) else {
            return Ok(None);
        };
        Ok(Some(binary::decode(bytes)?))
    }

    async fn remove(&self, key: &TrackingKey) -> Result<bool, TrackedContentRepositoryError> {
        Ok(self.records.write().await.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{AccessChannel, ContentEntry, PKG_TYPE_MAVEN, StoreKey, StoreType};
    use rstest::{fixture, rstest};

    #[fixture]
    fn key() -> TrackingKey {
        TrackingKey::new("build-42").expect("valid key")
    }

    fn entry(path: &str) -> ContentEntry {
        let store = StoreKey::new(PKG_TYPE_MAVEN, StoreType::Remote, "central")
            .expect("valid store key");
        ContentEntry::new(store, AccessChannel::Native, path)
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_keys_load_as_none(key: TrackingKey) {
        let repository = InMemoryTrackedContentRepository::new();
        let loaded = repository.load(&key).await.expect("load succeeds");
        assert!(loaded.is_none());
        assert!(repository.is_empty().await);
    }

    #[rstest]
    #[tokio::test]
    async fn saved_records_come_back_intact(key: TrackingKey) {
        let repository = InMemoryTrackedContentRepository::new();
        let content = TrackedContent::with_entries(
            key.clone(),
            vec![entry("/a/1.0/a-1.0.pom")],
            vec![entry("/b/2.0/b-2.0.jar"), entry("/c/3.0/c-3.0.jar")],
        );

        repository.save(&content).await.expect("save succeeds");
        let loaded = repository
            .load(&key)
            .await
            .expect("load succeeds")
            .expect("record present");

        assert_eq!(loaded.key(), content.key());
        assert_eq!(loaded.uploads(), content.uploads());
        assert_eq!(loaded.downloads(), content.downloads());
    }

    #[rstest]
    #[tokio::test]
    async fn saving_replaces_previous_record(key: TrackingKey) {
        let repository = InMemoryTrackedContentRepository::new();
        repository
            .save(&TrackedContent::with_entries(
                key.clone(),
                vec![entry("/old")],
                Vec::new(),
            ))
            .await
            .expect("first save");
        repository
            .save(&TrackedContent::new(key.clone()))
            .await
            .expect("second save");

        let loaded = repository
            .load(&key)
            .await
            .expect("load succeeds")
            .expect("record present");
        assert!(loaded.is_empty());
        assert_eq!(repository.len().await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn remove_reports_whether_a_record_existed(key: TrackingKey) {
        let repository = InMemoryTrackedContentRepository::new();
        repository
            .save(&TrackedContent::new(key.clone()))
            .await
            .expect("save succeeds");

        assert!(repository.remove(&key).await.expect("remove succeeds"));
        assert!(!repository.remove(&key).await.expect("remove succeeds"));
        assert!(repository.load(&key).await.expect("load").is_none());
    }
}
