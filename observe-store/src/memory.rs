//! In-memory store and link index.
//!
//! Used by tests and by embedders that already hold their data in process.
//! Forks are kept per id in insertion order; nothing is ever resolved here.

use crate::error::{StoreError, StoreResult};
use crate::{ElementStore, LinkIndex};
use async_trait::async_trait;
use observe_types::{Element, ElementId, Link};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::trace;

/// An element store backed by a map of id → forks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    forks: RwLock<HashMap<ElementId, Vec<Element>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from a JSON array of element documents.
    ///
    /// Documents sharing an id become forks of that id.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let documents: Vec<Element> = serde_json::from_str(json)?;
        let store = Self::new();
        store.insert_all(documents);
        Ok(store)
    }

    /// Adds a fork under its element id.
    pub fn insert(&self, fork: Element) {
        let mut forks = self.forks.write().unwrap_or_else(PoisonError::into_inner);
        forks.entry(fork.id.clone()).or_default().push(fork);
    }

    /// Adds every fork in `forks`.
    pub fn insert_all(&self, forks: impl IntoIterator<Item = Element>) {
        let mut map = self.forks.write().unwrap_or_else(PoisonError::into_inner);
        for fork in forks {
            map.entry(fork.id.clone()).or_default().push(fork);
        }
    }

    /// Removes an id and returns the forks it held.
    pub fn remove(&self, id: &ElementId) -> Vec<Element> {
        self.forks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .unwrap_or_default()
    }

    /// Number of distinct ids held.
    pub fn len(&self) -> usize {
        self.forks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ElementStore for MemoryStore {
    async fn get_element(&self, id: &ElementId) -> StoreResult<Vec<Element>> {
        let forks = self.forks.read().unwrap_or_else(PoisonError::into_inner);
        match forks.get(id) {
            Some(found) => {
                trace!("memory store hit {} ({} forks)", id, found.len());
                Ok(found.clone())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}

/// A link index backed by a map of observation id → link records.
#[derive(Debug, Default)]
pub struct MemoryLinkIndex {
    links: RwLock<HashMap<ElementId, Vec<Link>>>,
}

impl MemoryLinkIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one link.
    pub fn insert(&self, link: Link) {
        let mut links = self.links.write().unwrap_or_else(PoisonError::into_inner);
        links.entry(link.obs.clone()).or_default().push(link);
    }

    /// Records a link for every feature listed in the observation's `links`.
    pub fn index_observation(&self, observation: &Element) {
        for target in &observation.links {
            self.insert(Link::new(observation.id.clone(), target.clone()));
        }
    }

    /// Total number of link records.
    pub fn len(&self) -> usize {
        self.links
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LinkIndex for MemoryLinkIndex {
    async fn links(&self, observation: &ElementId) -> StoreResult<Vec<Link>> {
        let links = self.links.read().unwrap_or_else(PoisonError::into_inner);
        Ok(links.get(observation).cloned().unwrap_or_default())
    }
}
