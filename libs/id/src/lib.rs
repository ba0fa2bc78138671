//! # ims-id
//!
//! Typed identifiers for the internship management service.
//!
//! ## Design Principles
//!
//! - IDs are opaque and issued by the backing store; the service never
//!   derives meaning from their contents
//! - Every ID has one canonical string form (hyphenated lowercase UUID)
//! - IDs are typed so a registration id can never be passed where a
//!   lecturer id is expected
//!
//! ## ID Format
//!
//! Stored records are keyed by UUIDs, e.g. `7d3f0c5e-9a0b-4f0e-b3c4-2a1d9e8f6b71`.
//! Parsing accepts any UUID spelling the `uuid` crate accepts (braced,
//! simple, urn) and always formats back as hyphenated.
//!
//! Request ids use UUIDv7 so they sort by creation time in logs.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export uuid for consumers that need raw UUID operations
pub use uuid::Uuid;
