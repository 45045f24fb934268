//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod promotion_record_source;
mod tracked_content_repository;

pub use promotion_record_source::{PromotionRecordSource, PromotionRecords};
#[cfg(test)]
pub use tracked_content_repository::MockTrackedContentRepository;
pub use tracked_content_repository::{TrackedContentRepository, TrackedContentRepositoryError};
