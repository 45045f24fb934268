//! Driven port for fetching promotion records tied to a tracking session.
//!
//! The promote service owns the payload. The core relays it without
//! interpretation and only shapes failures into [`ErrorReport`]s.

use std::borrow::Cow;

use async_trait::async_trait;

use crate::domain::{ErrorReport, TrackingKey};

/// Promotion-record response relayed verbatim from the promote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionRecords {
    /// HTTP status reported by the promote service.
    pub status: u16,
    /// Content type reported by the promote service, if any.
    pub content_type: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl PromotionRecords {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Port for retrieving promotion records by tracking key.
///
/// Implementations surface every transport or remote failure as a workflow
/// [`ErrorReport`] carrying the remote status when one was received, and
/// `500` otherwise.
#[async_trait]
pub trait PromotionRecordSource: Send + Sync {
    /// Fetch the promotion records recorded for `tracking_key`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use tracking_backend::domain::TrackingKey;
    /// use tracking_backend::domain::ports::PromotionRecordSource;
    ///
    /// let key = TrackingKey::new("build-42")?;
    /// let records = source.fetch_promotion_records(&key).await?;
    /// assert_eq!(records.status, 200);
    /// ```
    async fn fetch_promotion_records(
        &self,
        tracking_key: &TrackingKey,
    ) -> Result<PromotionRecords, ErrorReport>;
}
