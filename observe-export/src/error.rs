//! Error types for the export layer.

use observe_store::StoreError;
use observe_types::ElementId;
use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that abort an export call.
///
/// Not-found lookups never appear here: an id missing from a store is
/// simply absent from the output.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A store or the link index failed for a reason other than not-found.
    #[error("lookup of {id} failed: {source}")]
    Lookup { id: ElementId, source: StoreError },

    /// An element cannot be written to an OsmChange document.
    #[error("invalid entity: {0}")]
    InvalidEntity(String),

    /// The XML writer failed.
    #[error("xml error: {0}")]
    Xml(String),
}

impl ExportError {
    /// Returns the id whose lookup failed, if this is a lookup error.
    pub fn failed_id(&self) -> Option<&ElementId> {
        match self {
            Self::Lookup { id, .. } => Some(id),
            _ => None,
        }
    }
}
