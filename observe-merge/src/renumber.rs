//! Changeset assembly and placeholder renumbering.
//!
//! Features created on a client carry arbitrary placeholder ids such as
//! `-5ab3c1`. Downstream OSM tooling expects new elements numbered
//! `-1, -2, -3, ...`, so the create list is renumbered densely in order and
//! stripped of versions, which mean nothing for an element that does not
//! exist upstream yet. Way node refs and relation member refs that pointed
//! at a renumbered element follow it to its new id.

use observe_types::{Action, Element, ElementId};
use std::collections::HashMap;

/// Assigns `-1, -2, ...` to `created` in order and drops their versions.
///
/// Returns the old id → new id mapping.
pub fn renumber_created(created: &mut [Element]) -> HashMap<ElementId, ElementId> {
    let mut renamed = HashMap::with_capacity(created.len());
    for (index, element) in created.iter_mut().enumerate() {
        let id = ElementId::placeholder(index + 1);
        let old = std::mem::replace(&mut element.id, id.clone());
        renamed.insert(old, id);
        element.version = None;
    }
    renamed
}

/// Accumulates merged features, split by action.
#[derive(Debug, Clone, Default)]
pub struct Changeset {
    created: Vec<Element>,
    modified: Vec<Element>,
}

impl Changeset {
    /// Creates an empty changeset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a merged feature.
    ///
    /// Elements without an action are classified from their id.
    pub fn push(&mut self, mut element: Element) {
        let action = match element.action {
            Some(action) => action,
            None => {
                let action = Action::for_id(&element.id);
                element.action = Some(action);
                action
            }
        };
        match action {
            Action::Create => self.created.push(element),
            Action::Modify => self.modified.push(element),
        }
    }

    /// Number of elements that will be created.
    pub fn created_len(&self) -> usize {
        self.created.len()
    }

    /// Number of elements that will be modified.
    pub fn modified_len(&self) -> usize {
        self.modified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.modified.is_empty()
    }

    /// Renumbers created elements and returns `created ++ modified`.
    ///
    /// References to renumbered elements are rewritten in every output
    /// element, created or modified.
    pub fn finish(mut self) -> Vec<Element> {
        let renamed = renumber_created(&mut self.created);
        let mut out = self.created;
        out.append(&mut self.modified);
        if !renamed.is_empty() {
            for element in &mut out {
                element.remap_references(&renamed);
            }
        }
        out
    }
}
