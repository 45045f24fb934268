//! HTTP inbound adapter.
//!
//! Maps error reports onto Actix responses so handlers can return
//! [`ApiResult`] directly.

pub mod error;

pub use error::{ApiResult, ErrorBody, REDACTED_MESSAGE};
