//! Driven port for persisting tracked content.
//!
//! Persistence engines are external; this port fixes the rules they must
//! respect. A record that was never stored loads as `Ok(None)`, and stored
//! records come back with the same key and entry sets.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ErrorReport, TrackedContent, TrackingKey};

define_port_error! {
    /// Errors surfaced by tracked-content persistence.
    pub enum TrackedContentRepositoryError {
        /// The record could not be converted to its durable form.
        Encode { message: String } =>
            "tracked content encode failed: {message}",
        /// Stored bytes could not be converted back into a record.
        Decode { message: String } =>
            "tracked content decode failed: {message}",
    }
}

impl From<TrackedContentRepositoryError> for ErrorReport {
    fn from(value: TrackedContentRepositoryError) -> Self {
        Self::workflow("Failed to access tracked content store").with_cause(value)
    }
}

/// Port for storing and loading [`TrackedContent`] by key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackedContentRepository: Send + Sync {
    /// Store `content`, replacing any record with the same key.
    async fn save(&self, content: &TrackedContent) -> Result<(), TrackedContentRepositoryError>;

    /// Load the record for `key`; `Ok(None)` when nothing was stored.
    async fn load(
        &self,
        key: &TrackingKey,
    ) -> Result<Option<TrackedContent>, TrackedContentRepositoryError>;

    /// Remove the record for `key`, returning whether one existed.
    async fn remove(&self, key: &TrackingKey) -> Result<bool, TrackedContentRepositoryError>;
}
