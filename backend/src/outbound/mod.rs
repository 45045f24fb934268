//! Outbound adapters implementing domain ports.
//!
//! - `codec`: JSON wire and versioned binary encodings of tracked content.
//! - `memory`: in-memory tracked-content repository.
//! - `promote`: reqwest client for the promote service.

pub mod codec;
pub mod memory;
pub mod promote;

pub use memory::InMemoryTrackedContentRepository;
