//! Tracking-record core for an artifact repository manager.
//!
//! - [`domain`] holds the tracked-content model, the resilient error report
//!   and the driven ports.
//! - [`outbound`] implements those ports: codecs, an in-memory repository
//!   and the promote-service client.
//! - [`inbound`] maps error reports onto HTTP responses.

pub mod domain;
pub mod inbound;
pub mod outbound;
