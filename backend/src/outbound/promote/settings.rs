//! Connection profile for the promote service, loaded via OrthoConfig.
//!
//! Values come from `PROMOTE_SERVICE_API_*` environment variables, matching
//! command-line flags, or an optional configuration file.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::ErrorReport;

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const URL_ENV: &str = "PROMOTE_SERVICE_API_URL";

/// Settings for the `promote-service-api` connection profile.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PROMOTE_SERVICE_API")]
pub struct PromoteServiceSettings {
    /// Base URL of the promote service.
    pub url: Option<String>,
    /// Request timeout in seconds.
    #[ortho_config(default = 30)]
    pub timeout_seconds: u64,
    /// Optional bearer token sent with every request.
    pub auth_token: Option<String>,
}

impl PromoteServiceSettings {
    /// Effective request timeout; at least one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }

    /// Parse the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns a lifecycle [`ErrorReport`] when the URL is unset, does not
    /// parse, or cannot carry a path.
    pub fn base_url(&self) -> Result<Url, ErrorReport> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| {
                ErrorReport::lifecycle("Promote service URL is not configured; set {}")
                    .with_param(URL_ENV)
            })?;

        let url = Url::parse(raw).map_err(|error| {
            ErrorReport::lifecycle("Invalid promote service URL {}")
                .with_param(raw)
                .with_cause(error)
        })?;
        if url.cannot_be_a_base() {
            return Err(
                ErrorReport::lifecycle("Promote service URL {} cannot carry a path")
                    .with_param(raw),
            );
        }
        Ok(url)
    }
}
