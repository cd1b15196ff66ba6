//! Core type definitions for observation export.
//!
//! This crate defines the plain data shared by every other crate in the
//! workspace:
//! - Element identifiers, including client-side placeholder ids
//! - Opaque store versions
//! - The [`Element`] record (map features and observations alike)
//! - Observation → feature [`Link`] records
//! - Changeset [`Action`] classification
//!
//! Nothing here talks to a store. Resolution and merge rules live in
//! `observe-merge`; lookups live in `observe-store` and `observe-export`.

mod element;
mod ids;
mod link;

pub use element::{parse_timestamp, Action, Element, ElementKind};
pub use ids::{ElementId, Version};
pub use link::Link;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when parsing or decoding types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid element id: {0:?}")]
    InvalidId(String),

    #[error("unknown element type: {0}")]
    UnknownKind(String),

    #[error("unknown changeset action: {0}")]
    UnknownAction(String),
}
