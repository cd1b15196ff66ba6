//! Tag merging of observations onto the feature they annotate.

use crate::fork::sort_oldest_first;
use observe_types::{Action, Element};

/// Folds the tags of `observations` onto a copy of `feature`.
///
/// Observations are applied oldest first, so on a key collision a later
/// observation shadows an earlier one and any observation shadows the
/// feature's own value. Only tags are taken from observations; position,
/// version and other feature fields are kept as they were.
///
/// The result is classified [`Action::Create`] if the feature carries a
/// placeholder id and [`Action::Modify`] otherwise.
pub fn merge_observations(feature: &Element, observations: &[&Element]) -> Element {
    let mut ordered = observations.to_vec();
    sort_oldest_first(&mut ordered);

    let mut merged = feature.clone();
    for obs in ordered {
        merged
            .tags
            .extend(obs.tags.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged.links.clear();
    merged.action = Some(Action::for_id(&merged.id));
    merged
}
