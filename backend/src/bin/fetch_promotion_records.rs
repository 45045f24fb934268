//! Fetch promotion records for a tracking session and relay them to stdout.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};

use clap::Parser;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use tracking_backend::domain::ports::PromotionRecordSource;
use tracking_backend::domain::{ErrorReport, TrackingKey};
use tracking_backend::outbound::promote::{PromoteHttpClient, PromoteServiceSettings};

const BIN_NAME: &str = "fetch-promotion-records";

/// `fetch-promotion-records` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fetch-promotion-records",
    about = "Fetch promotion records for a tracking ID from the promote service",
    version
)]
struct CliArgs {
    /// Tracking ID whose promotion records are fetched.
    #[arg(long = "tracking-id", value_name = "id")]
    tracking_id: String,
    /// Promote service base URL. Falls back to `PROMOTE_SERVICE_API_URL`.
    #[arg(long = "url", value_name = "url")]
    url: Option<String>,
    /// Request timeout in seconds. Falls back to
    /// `PROMOTE_SERVICE_API_TIMEOUT_SECONDS`.
    #[arg(long = "timeout-seconds", value_name = "seconds")]
    timeout_seconds: Option<u64>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let tracking_key = TrackingKey::new(args.tracking_id.as_str())
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    let settings = load_settings(args.url, args.timeout_seconds)?;
    let client = PromoteHttpClient::from_settings(&settings).map_err(report_to_io)?;

    let records = client
        .fetch_promotion_records(&tracking_key)
        .await
        .map_err(report_to_io)?;
    info!(
        tracking_id = %tracking_key,
        status = records.status,
        bytes = records.body.len(),
        "promotion records fetched"
    );

    let mut stdout = io::stdout().lock();
    stdout.write_all(&records.body)?;
    stdout.flush()
}

fn load_settings(
    url: Option<String>,
    timeout_seconds: Option<u64>,
) -> io::Result<PromoteServiceSettings> {
    let mut settings = PromoteServiceSettings::load_from_iter([OsString::from(BIN_NAME)])
        .map_err(|error| io::Error::other(format!("load promote service settings: {error}")))?;
    if url.is_some() {
        settings.url = url;
    }
    if let Some(timeout_seconds) = timeout_seconds {
        settings.timeout_seconds = timeout_seconds;
    }
    Ok(settings)
}

fn report_to_io(report: ErrorReport) -> io::Error {
    error!(
        status = report.effective_status(),
        cause = report.cause_chain().as_deref().unwrap_or("none"),
        "{}",
        report.message()
    );
    io::Error::other(report.message().to_owned())
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings overrides and error reporting.

    use std::time::Duration;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn cli_url_applies_when_environment_is_empty() {
        let _guard = lock_env([
            ("PROMOTE_SERVICE_API_URL", None::<String>),
            ("PROMOTE_SERVICE_API_TIMEOUT_SECONDS", None::<String>),
            ("PROMOTE_SERVICE_API_AUTH_TOKEN", None::<String>),
        ]);

        let settings = load_settings(Some("http://127.0.0.1:9/".to_owned()), None)
            .expect("settings should load without environment");
        let url = settings.base_url().expect("override URL parses");
        assert_eq!(url.as_str(), "http://127.0.0.1:9/");
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }

    #[rstest]
    fn cli_timeout_overrides_environment() {
        let _guard = lock_env([
            ("PROMOTE_SERVICE_API_URL", None::<String>),
            ("PROMOTE_SERVICE_API_TIMEOUT_SECONDS", Some("5".to_owned())),
            ("PROMOTE_SERVICE_API_AUTH_TOKEN", None::<String>),
        ]);

        let settings = load_settings(None, Some(2)).expect("settings should load");
        assert_eq!(settings.timeout(), Duration::from_secs(2));
    }

    #[rstest]
    fn reported_errors_carry_only_the_message() {
        let report = ErrorReport::lifecycle("Invalid promote service URL {}")
            .with_param("ftp:/x")
            .with_cause(io::Error::other("resolver at 10.0.0.7 refused"));

        let error = report_to_io(report);
        assert_eq!(error.to_string(), "Invalid promote service URL ftp:/x");
        assert!(!format!("{error:?}").contains("10.0.0.7"));
    }
}
