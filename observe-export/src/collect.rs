//! Fan-out lookups against the stores and the link index.
//!
//! Each phase issues one group of independent lookups per id, keeps at most
//! `max_in_flight` groups running, and joins them structurally: the phase
//! completes once every group has completed, or as soon as any lookup fails
//! with something other than not-found. Groups are polled in completion
//! order but results are put back in input order, so the output never
//! depends on which store answered first.

use crate::error::{ExportError, ExportResult};
use crate::join::attach_links;
use futures::stream::{self, StreamExt, TryStreamExt};
use observe_merge::resolve;
use observe_store::{ElementStore, LinkIndex};
use observe_types::{Element, ElementId, Link};
use std::collections::HashSet;
use std::future::Future;
use tracing::debug;

/// Resolved records of one export call.
#[derive(Debug, Default)]
pub(crate) struct Collected {
    /// Resolved observations, in requested id order, with `links` attached.
    pub observations: Vec<Element>,
    /// Flattened link records, in discovery order.
    pub links: Vec<Link>,
    /// Resolved linked features, in first-discovery order. Empty unless
    /// linked features were requested.
    pub features: Vec<Element>,
}

/// The collaborators a fan-out reads from.
#[derive(Clone, Copy)]
pub(crate) struct Sources<'a> {
    pub features: &'a dyn ElementStore,
    pub observations: &'a dyn ElementStore,
    pub links: &'a dyn LinkIndex,
}

/// Resolves observations and their links, then optionally the linked features.
pub(crate) async fn collect(
    sources: Sources<'_>,
    ids: &[ElementId],
    linked_nodes: bool,
    max_in_flight: usize,
) -> ExportResult<Collected> {
    let ids = distinct(ids.iter());
    debug!("collecting {} observations", ids.len());

    let found = fan_out(&ids, max_in_flight, |id| async move {
        futures::try_join!(
            lookup(sources.observations, id),
            lookup_links(sources.links, id)
        )
    })
    .await?;

    let mut observations = Vec::with_capacity(found.len());
    let mut links = Vec::new();
    for (observation, observation_links) in found {
        observations.extend(observation);
        links.extend(observation_links);
    }
    attach_links(&mut observations, &links);

    if !linked_nodes {
        return Ok(Collected {
            observations,
            links,
            features: Vec::new(),
        });
    }

    let targets = distinct(observations.iter().flat_map(|o| o.links.iter()));
    debug!("collecting {} linked features", targets.len());

    let features = fan_out(&targets, max_in_flight, |id| async move {
        let (from_observations, from_features) = futures::try_join!(
            lookup(sources.observations, id),
            lookup(sources.features, id)
        )?;
        Ok::<_, ExportError>(resolve(from_observations.into_iter().chain(from_features)))
    })
    .await?;

    Ok(Collected {
        observations,
        links,
        features: features.into_iter().flatten().collect(),
    })
}

/// Runs `op` for every id with bounded concurrency.
///
/// Returns the results in `ids` order, or the first error to complete.
async fn fan_out<'a, T, F, Fut>(
    ids: &'a [ElementId],
    max_in_flight: usize,
    op: F,
) -> ExportResult<Vec<T>>
where
    F: Fn(&'a ElementId) -> Fut,
    Fut: Future<Output = ExportResult<T>>,
{
    let op = &op;
    let mut indexed: Vec<(usize, T)> = stream::iter(ids.iter().enumerate())
        .map(|(index, id)| async move { op(id).await.map(|value| (index, value)) })
        .buffer_unordered(max_in_flight.max(1))
        .try_collect()
        .await?;
    indexed.sort_unstable_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, value)| value).collect())
}

/// Resolves `id` in `store`. Not-found and empty fork sets are both `None`.
async fn lookup(store: &dyn ElementStore, id: &ElementId) -> ExportResult<Option<Element>> {
    match store.get_element(id).await {
        Ok(forks) => Ok(resolve(forks)),
        Err(err) if err.is_not_found() => {
            debug!("{} not found", id);
            Ok(None)
        }
        Err(source) => Err(ExportError::Lookup {
            id: id.clone(),
            source,
        }),
    }
}

async fn lookup_links(index: &dyn LinkIndex, id: &ElementId) -> ExportResult<Vec<Link>> {
    match index.links(id).await {
        Ok(links) => Ok(links),
        Err(err) if err.is_not_found() => Ok(Vec::new()),
        Err(source) => Err(ExportError::Lookup {
            id: id.clone(),
            source,
        }),
    }
}

/// Removes repeated ids, keeping first occurrences in order.
fn distinct<'a>(ids: impl Iterator<Item = &'a ElementId>) -> Vec<ElementId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).cloned().collect()
}
