//! Reqwest-backed promote-service client.
//!
//! This adapter owns transport details only: URL construction, the request
//! timeout, request filtering and mapping of HTTP failures into workflow
//! error reports. Response bodies are relayed without interpretation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use super::filter::{BearerTokenFilter, NoopRequestFilter, RequestFilter};
use super::settings::PromoteServiceSettings;
use crate::domain::ports::{PromotionRecordSource, PromotionRecords};
use crate::domain::{DEFAULT_ERROR_STATUS, ErrorReport, TrackingKey};

const TRACKING_PATH: [&str; 4] = ["api", "promotion", "admin", "tracking"];

/// Promote-service client performing `GET` requests against one base URL.
#[derive(Clone)]
pub struct PromoteHttpClient {
    client: Client,
    base_url: Url,
    filter: Arc<dyn RequestFilter>,
}

impl PromoteHttpClient {
    /// Build a client with an explicit request timeout and no request filter.
    /// ```rust,ignore
    /// let client = PromoteHttpClient::new(base_url, Duration::from_secs(30))?;
    /// ```
    /// # Errors
    ///
    /// Returns a lifecycle error when `base_url` cannot carry a path or the
    /// reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ErrorReport> {
        if base_url.cannot_be_a_base() {
            return Err(
                ErrorReport::lifecycle("Promote service URL {} cannot carry a path")
                    .with_param(base_url.as_str()),
            );
        }
        let client = Client::builder().timeout(timeout).build().map_err(|error| {
            ErrorReport::lifecycle("Failed to build promote service client").with_cause(error)
        })?;
        Ok(Self {
            client,
            base_url,
            filter: Arc::new(NoopRequestFilter),
        })
    }

    /// Build a client from the `promote-service-api` connection profile.
    ///
    /// A configured auth token installs a [`BearerTokenFilter`].
    ///
    /// # Errors
    ///
    /// Returns a lifecycle error when the profile has no usable URL or the
    /// reqwest client cannot be constructed.
    pub fn from_settings(settings: &PromoteServiceSettings) -> Result<Self, ErrorReport> {
        let client = Self::new(settings.base_url()?, settings.timeout())?;
        Ok(match settings.auth_token.as_deref() {
            Some(token) => client.with_filter(BearerTokenFilter::new(token)),
            None => client,
        })
    }

    /// Replace the request filter applied to every call.
    #[must_use]
    pub fn with_filter(mut self, filter: impl RequestFilter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    /// Base URL every request is resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the promotion records for `tracking_key`.
    ///
    /// The id is percent-encoded as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns a workflow error when the base URL cannot carry a path.
    pub fn records_url(&self, tracking_key: &TrackingKey) -> Result<Url, ErrorReport> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ErrorReport::workflow("Promote service URL {} cannot carry a path")
                    .with_param(self.base_url.as_str())
            })?
            .pop_if_empty()
            .extend(TRACKING_PATH)
            .push(tracking_key.id());
        Ok(url)
    }
}

#[async_trait]
impl PromotionRecordSource for PromoteHttpClient {
    async fn fetch_promotion_records(
        &self,
        tracking_key: &TrackingKey,
    ) -> Result<PromotionRecords, ErrorReport> {
        let url = self.records_url(tracking_key)?;
        debug!(tracking_id = %tracking_key, %url, "fetching promotion records");

        let request = self
            .client
            .get(url)
            .header(ACCEPT, "application/json");
        let response = self
            .filter
            .apply(request)
            .send()
            .await
            .map_err(|error| map_transport_error(tracking_key, error))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(tracking_key, error))?;
        if !status.is_success() {
            return Err(map_status_error(tracking_key, status, body.as_ref()));
        }

        Ok(PromotionRecords {
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}

fn map_transport_error(tracking_key: &TrackingKey, error: reqwest::Error) -> ErrorReport {
    let reason = if error.is_timeout() {
        "request timed out"
    } else {
        "transport failure"
    };
    warn!(tracking_id = %tracking_key, error = %error, "promote service call failed");
    ErrorReport::workflow_with_status(
        i32::from(DEFAULT_ERROR_STATUS),
        "Failed to retrieve promotion records for tracking ID {}: {}",
    )
    .with_param(tracking_key)
    .with_param(reason)
    .with_cause(error)
}

fn map_status_error(tracking_key: &TrackingKey, status: StatusCode, body: &[u8]) -> ErrorReport {
    let preview = body_preview(body);
    warn!(
        tracking_id = %tracking_key,
        status = status.as_u16(),
        body = %preview,
        "promote service rejected request"
    );
    if preview.is_empty() {
        ErrorReport::workflow_with_status(
            i32::from(status.as_u16()),
            "Promote service returned status {} for tracking ID {}",
        )
        .with_param(status.as_u16())
        .with_param(tracking_key)
    } else {
        ErrorReport::workflow_with_status(
            i32::from(status.as_u16()),
            "Promote service returned status {} for tracking ID {}: {}",
        )
        .with_param(status.as_u16())
        .with_param(tracking_key)
        .with_param(preview)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
