//! Domain primitives and aggregates.
//!
//! Purpose: define the tracked-content model and the error reports that
//! carry failures to the service boundary. Keep types immutable where the
//! model allows it and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - `TrackingKey`: tracking-session identity.
//! - `StoreKey`, `StoreType`: backing-store references.
//! - `AccessChannel`, `ContentEntry`: one recorded access.
//! - `TrackedContent`: upload/download aggregate keyed by `TrackingKey`.
//! - `ErrorReport`, `ErrorKind`, `Param`: boundary-crossing failures.
//! - `ports`: driven ports implemented by outbound adapters.

pub mod content_entry;
pub mod error;
pub mod ports;
pub mod store_key;
pub mod tracked_content;
pub mod tracking_key;

pub use self::content_entry::{AccessChannel, ContentEntry};
pub use self::error::{Cause, DEFAULT_ERROR_STATUS, ErrorKind, ErrorReport, Param};
pub use self::store_key::{
    PKG_TYPE_GENERIC_HTTP, PKG_TYPE_MAVEN, PKG_TYPE_NPM, StoreKey, StoreKeyValidationError,
    StoreType,
};
pub use self::tracked_content::TrackedContent;
pub use self::tracking_key::{TrackingKey, TrackingKeyValidationError};
