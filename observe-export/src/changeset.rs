//! Changeset assembly from collected records.

use crate::join::LinkedObservations;
use observe_merge::{merge_observations, Changeset};
use observe_types::{Element, ElementId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Merges every linked feature with its observations and classifies it.
///
/// Only features with at least one linked observation are emitted. Output is
/// `created ++ modified`, with created ids renumbered `-1, -2, ...` in
/// feature discovery order.
pub fn build_changeset(observations: &[Element], features: &[Element]) -> Vec<Element> {
    let features: HashMap<&ElementId, &Element> = features.iter().map(|f| (&f.id, f)).collect();
    let linked = LinkedObservations::from_observations(observations);

    let mut changeset = Changeset::new();
    for (feature_id, linked_observations) in linked.iter() {
        let Some(feature) = features.get(feature_id) else {
            debug!("skipping link target {}: not found in either store", feature_id);
            continue;
        };
        if !feature.kind.is_feature() {
            warn!("skipping link target {}: it is a {}", feature_id, feature.kind);
            continue;
        }
        changeset.push(merge_observations(feature, linked_observations));
    }

    debug!(
        "changeset: {} created, {} modified",
        changeset.created_len(),
        changeset.modified_len()
    );
    changeset.finish()
}
