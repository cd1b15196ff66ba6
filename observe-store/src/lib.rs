//! Read interfaces for the stores the export engine reconciles.
//!
//! Export reads from three collaborators and never writes to any of them:
//!
//! - a **feature store** holding map features (nodes, ways, relations),
//! - an **observation store** holding observations (and features created
//!   alongside them on a client),
//! - a **link index** recording which features each observation annotates.
//!
//! Both stores are replicated and fork-tolerant: a lookup returns every
//! concurrent revision of an id, and choosing between them is the caller's
//! job. [`memory`] provides in-process implementations of both interfaces.

mod error;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryLinkIndex, MemoryStore};

use async_trait::async_trait;
use observe_types::{Element, ElementId, Link};

/// A replicated element store.
#[async_trait]
pub trait ElementStore: Send + Sync {
    /// Returns all current forks of `id`.
    ///
    /// An id the store has never seen may be reported either as an empty
    /// list or as [`StoreError::NotFound`]; callers must treat both as absent.
    async fn get_element(&self, id: &ElementId) -> StoreResult<Vec<Element>>;
}

/// Index from an observation to the features it is linked to.
#[async_trait]
pub trait LinkIndex: Send + Sync {
    /// Returns the link records of `observation`, in index order.
    async fn links(&self, observation: &ElementId) -> StoreResult<Vec<Link>>;
}
