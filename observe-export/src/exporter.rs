//! The export API.

use crate::changeset::build_changeset;
use crate::collect::{collect, Sources};
use crate::config::{ExportConfig, ExportOptions};
use crate::error::ExportResult;
use crate::osmchange::to_osmchange_xml;
use observe_store::{ElementStore, LinkIndex};
use observe_types::{Element, ElementId};
use std::sync::Arc;
use tracing::info;

/// Exports observations and the features they annotate.
///
/// Holds the three read-only collaborators. Every call builds its results
/// from scratch; nothing is cached between calls, so one exporter can serve
/// concurrent callers behind an `Arc`.
pub struct ObservationExporter {
    /// Canonical map features.
    features: Arc<dyn ElementStore>,
    /// Observations, plus features created alongside them on a client.
    observations: Arc<dyn ElementStore>,
    /// Observation → feature links.
    links: Arc<dyn LinkIndex>,
    config: ExportConfig,
}

impl ObservationExporter {
    /// Creates an exporter with the default configuration.
    pub fn new(
        features: Arc<dyn ElementStore>,
        observations: Arc<dyn ElementStore>,
        links: Arc<dyn LinkIndex>,
    ) -> Self {
        Self::with_config(features, observations, links, ExportConfig::default())
    }

    /// Creates an exporter with a custom configuration.
    pub fn with_config(
        features: Arc<dyn ElementStore>,
        observations: Arc<dyn ElementStore>,
        links: Arc<dyn LinkIndex>,
        config: ExportConfig,
    ) -> Self {
        Self {
            features,
            observations,
            links,
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    fn sources(&self) -> Sources<'_> {
        Sources {
            features: self.features.as_ref(),
            observations: self.observations.as_ref(),
            links: self.links.as_ref(),
        }
    }

    /// Resolves the requested observations as a flat OSM JSON list.
    ///
    /// Each observation carries its linked feature ids in `links`. Ids that
    /// resolve to nothing are left out. With
    /// [`linked_nodes`](ExportOptions::linked_nodes), the resolved linked
    /// features follow the observations.
    pub async fn export_entities(
        &self,
        ids: &[ElementId],
        options: ExportOptions,
    ) -> ExportResult<Vec<Element>> {
        info!(
            "exporting {} observations (linked_nodes={})",
            ids.len(),
            options.linked_nodes
        );
        let collected = collect(
            self.sources(),
            ids,
            options.linked_nodes,
            self.config.max_in_flight,
        )
        .await?;

        let mut entities = collected.observations;
        entities.extend(collected.features);
        info!("exported {} entities", entities.len());
        Ok(entities)
    }

    /// Builds the OsmChange-style diff for the features the requested
    /// observations link to.
    ///
    /// Returns created features (renumbered `-1, -2, ...`, without versions)
    /// followed by modified ones.
    pub async fn export_changeset(&self, ids: &[ElementId]) -> ExportResult<Vec<Element>> {
        info!("exporting changeset for {} observations", ids.len());
        let collected = collect(self.sources(), ids, true, self.config.max_in_flight).await?;
        let changes = build_changeset(&collected.observations, &collected.features);
        info!(
            "changeset has {} entities from {} links",
            changes.len(),
            collected.links.len()
        );
        Ok(changes)
    }

    /// [`export_changeset`](Self::export_changeset) as an OsmChange XML
    /// document.
    pub async fn export_changeset_xml(&self, ids: &[ElementId]) -> ExportResult<String> {
        let changes = self.export_changeset(ids).await?;
        to_osmchange_xml(&changes, &self.config.generator)
    }
}
