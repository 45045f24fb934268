//! Promote-service outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `PromotionRecordSource` port together with its connection profile and
//! request filters.

mod filter;
mod http_client;
mod settings;

pub use filter::{BearerTokenFilter, NoopRequestFilter, RequestFilter};
pub use http_client::PromoteHttpClient;
pub use settings::{DEFAULT_TIMEOUT_SECONDS, PromoteServiceSettings};
