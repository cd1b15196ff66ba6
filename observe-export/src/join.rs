//! Joining observations with the features they link to.
//!
//! The link index is read per observation. [`attach_links`] writes those
//! records onto the observations themselves; [`LinkedObservations`] inverts
//! them into feature → observations for the changeset merge.

use observe_types::{Element, ElementId, Link};
use std::collections::HashMap;
use tracing::debug;

/// Replaces each observation's `links` with its link-index targets.
///
/// Links are attached in `links` order. Records whose observation did not
/// resolve are dropped.
pub fn attach_links(observations: &mut [Element], links: &[Link]) {
    let mut by_id: HashMap<ElementId, usize> = HashMap::with_capacity(observations.len());
    for (index, observation) in observations.iter_mut().enumerate() {
        observation.links.clear();
        by_id.insert(observation.id.clone(), index);
    }

    for link in links {
        match by_id.get(&link.obs) {
            Some(&index) => observations[index].links.push(link.link.clone()),
            None => debug!("dropping link {} -> {}: observation not resolved", link.obs, link.link),
        }
    }
}

/// Feature id → the observations linking to it, in discovery order.
#[derive(Debug, Default)]
pub struct LinkedObservations<'a> {
    order: Vec<&'a ElementId>,
    by_feature: HashMap<&'a ElementId, Vec<&'a Element>>,
}

impl<'a> LinkedObservations<'a> {
    /// Indexes `observations` by the features in their `links`.
    ///
    /// Features are ordered by first appearance, walking observations in
    /// order and each observation's links in order. An observation listed
    /// twice against the same feature is counted once.
    pub fn from_observations(observations: &'a [Element]) -> Self {
        let mut order = Vec::new();
        let mut by_feature: HashMap<&'a ElementId, Vec<&'a Element>> = HashMap::new();
        for observation in observations {
            for feature in &observation.links {
                let linked = by_feature.entry(feature).or_insert_with(|| {
                    order.push(feature);
                    Vec::new()
                });
                if !linked.iter().any(|o| o.id == observation.id) {
                    linked.push(observation);
                }
            }
        }
        Self { order, by_feature }
    }

    /// Number of distinct linked features.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Observations linking to `feature`, in discovery order.
    pub fn get(&self, feature: &ElementId) -> &[&'a Element] {
        self.by_feature
            .get(feature)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates features in discovery order with their observations.
    pub fn iter(&self) -> impl Iterator<Item = (&'a ElementId, &'_ [&'a Element])> + '_ {
        self.order.iter().map(|id| (*id, self.get(id)))
    }
}
