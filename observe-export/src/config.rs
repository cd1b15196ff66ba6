//! Exporter configuration and per-call options.

/// Default number of lookup groups kept in flight during a fan-out.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Generator name written into OsmChange documents.
pub const DEFAULT_GENERATOR: &str = "observe-export";

/// Configuration for an [`ObservationExporter`](crate::ObservationExporter).
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Maximum lookup groups in flight at once. Each group is the pair of
    /// lookups issued for one id. Values below 1 are treated as 1.
    pub max_in_flight: usize,
    /// Value of the `generator` attribute on `<osmChange>`.
    pub generator: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            generator: DEFAULT_GENERATOR.to_string(),
        }
    }
}

/// Options for [`export_entities`](crate::ObservationExporter::export_entities).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Also resolve and return every feature the observations link to.
    pub linked_nodes: bool,
}

impl ExportOptions {
    /// Options that include linked features.
    pub fn with_linked_nodes() -> Self {
        Self { linked_nodes: true }
    }
}
