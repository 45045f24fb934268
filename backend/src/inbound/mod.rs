//! Inbound adapters that translate domain outcomes for external callers
//! while keeping framework details at the edge.
//!
//! HTTP mapping lives under [`http`].

pub mod http;
