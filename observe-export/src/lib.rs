//! Observation export engine.
//!
//! Exports observations, and the map features they annotate, from a
//! replicated fork-tolerant store as either a flat OSM JSON list or an
//! OsmChange diff.
//!
//! # Architecture
//!
//! - **Collect**: resolve each observation and read its links, then
//!   (optionally) resolve every linked feature from both stores. Lookups fan
//!   out concurrently and join structurally; the first non-not-found failure
//!   aborts the call.
//! - **Join**: attach links to observations and invert them into
//!   feature → observations.
//! - **Merge**: fold observation tags onto each linked feature, oldest first,
//!   and classify it as create or modify.
//! - **Renumber**: created features get ids `-1, -2, ...` and lose their
//!   version.
//! - **Serialize**: optionally write the changeset as OsmChange XML.
//!
//! # Example
//!
//! ```
//! use observe_export::{ExportOptions, ObservationExporter};
//! use observe_store::{MemoryLinkIndex, MemoryStore};
//! use observe_types::{Element, ElementId, Link};
//! use std::sync::Arc;
//!
//! # futures::executor::block_on(async {
//! let features = Arc::new(MemoryStore::new());
//! let observations = Arc::new(MemoryStore::new());
//! let links = Arc::new(MemoryLinkIndex::new());
//!
//! features.insert(Element::node("1").with_version("a").with_tag("amenity", "well"));
//! observations.insert(Element::observation("o1").with_tag("water", "dry"));
//! links.insert(Link::new("o1", "1"));
//!
//! let exporter = ObservationExporter::new(features, observations, links);
//! let ids = [ElementId::new("o1")];
//!
//! let entities = exporter.export_entities(&ids, ExportOptions::default()).await.unwrap();
//! assert_eq!(entities[0].links, vec![ElementId::new("1")]);
//!
//! let changes = exporter.export_changeset(&ids).await.unwrap();
//! assert_eq!(changes[0].tags["water"], "dry");
//! # });
//! ```

mod changeset;
mod collect;
mod config;
mod error;
mod exporter;
pub mod join;
pub mod osmchange;

pub use changeset::build_changeset;
pub use config::{ExportConfig, ExportOptions, DEFAULT_GENERATOR, DEFAULT_MAX_IN_FLIGHT};
pub use error::{ExportError, ExportResult};
pub use exporter::ObservationExporter;
pub use join::{attach_links, LinkedObservations};
pub use osmchange::{to_osmchange_xml, OSMCHANGE_VERSION};
