//! Shared test helpers for export tests.

#![allow(dead_code)]

use async_trait::async_trait;
use observe_export::{ExportConfig, ObservationExporter};
use observe_store::{
    ElementStore, LinkIndex, MemoryLinkIndex, MemoryStore, StoreError, StoreResult,
};
use observe_types::{Element, ElementId, Link};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const OBS_DB: &str = include_str!("../fixtures/obs_db.json");
pub const OSM_ORG_DB: &str = include_str!("../fixtures/osm_org_db.json");
pub const LINKS: &str = include_str!("../fixtures/links.json");

/// The two observation ids the fixtures are built around.
pub fn fixture_ids() -> Vec<ElementId> {
    vec![
        ElementId::new("5376464111285135"),
        ElementId::new("3698308318298018"),
    ]
}

pub fn ids(raw: &[&str]) -> Vec<ElementId> {
    raw.iter().map(|s| ElementId::new(*s)).collect()
}

/// Installs a test log subscriber honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Loads the fixture stores: (features, observations, links).
pub fn fixture_stores() -> (Arc<MemoryStore>, Arc<MemoryStore>, Arc<MemoryLinkIndex>) {
    let features = Arc::new(MemoryStore::from_json(OSM_ORG_DB).unwrap());
    let observations = Arc::new(MemoryStore::from_json(OBS_DB).unwrap());
    let index = Arc::new(MemoryLinkIndex::new());
    let links: Vec<Link> = serde_json::from_str(LINKS).unwrap();
    for link in links {
        index.insert(link);
    }
    (features, observations, index)
}

pub fn fixture_exporter() -> ObservationExporter {
    let (features, observations, links) = fixture_stores();
    ObservationExporter::new(features, observations, links)
}

pub fn exporter_with(
    features: Arc<dyn ElementStore>,
    observations: Arc<dyn ElementStore>,
    links: Arc<dyn LinkIndex>,
    max_in_flight: usize,
) -> ObservationExporter {
    ObservationExporter::with_config(
        features,
        observations,
        links,
        ExportConfig {
            max_in_flight,
            ..ExportConfig::default()
        },
    )
}

// ── Scripted collaborators ────────────────────────────────────────

/// Per-id behaviour of a scripted lookup.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Simulated latency in milliseconds.
    pub delay_ms: u64,
    /// When set, the lookup fails with `StoreError::Unavailable(message)`.
    pub fail: Option<String>,
    /// When set, the lookup succeeds with no forks instead of not-found.
    pub empty: bool,
}

/// Shared counters for concurrency assertions.
#[derive(Debug, Default)]
pub struct Gauge {
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    per_id: Mutex<HashMap<ElementId, usize>>,
}

impl Gauge {
    fn enter(&self, id: &ElementId) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        *self.per_id.lock().unwrap().entry(id.clone()).or_default() += 1;
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn calls_for(&self, id: &str) -> usize {
        self.per_id
            .lock()
            .unwrap()
            .get(&ElementId::new(id))
            .copied()
            .unwrap_or(0)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

async fn play(script: Option<&Script>, id: &ElementId) -> StoreResult<bool> {
    let Some(script) = script else {
        return Ok(false);
    };
    if script.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(script.delay_ms)).await;
    }
    if let Some(message) = &script.fail {
        return Err(StoreError::Unavailable(format!("{message} ({id})")));
    }
    Ok(script.empty)
}

/// An element store that delays, fails or empties selected lookups.
#[derive(Default)]
pub struct ScriptedStore {
    pub inner: MemoryStore,
    pub scripts: HashMap<ElementId, Script>,
    pub default_delay_ms: u64,
    pub gauge: Arc<Gauge>,
}

impl ScriptedStore {
    pub fn wrap(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn script(mut self, id: &str, script: Script) -> Self {
        self.scripts.insert(ElementId::new(id), script);
        self
    }

    pub fn default_delay(mut self, delay_ms: u64) -> Self {
        self.default_delay_ms = delay_ms;
        self
    }
}

#[async_trait]
impl ElementStore for ScriptedStore {
    async fn get_element(&self, id: &ElementId) -> StoreResult<Vec<Element>> {
        self.gauge.enter(id);
        if self.default_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.default_delay_ms)).await;
        }
        let result = match play(self.scripts.get(id), id).await {
            Ok(true) => Ok(Vec::new()),
            Ok(false) => self.inner.get_element(id).await,
            Err(err) => Err(err),
        };
        self.gauge.leave();
        result
    }
}

/// A link index that delays or fails selected lookups.
#[derive(Default)]
pub struct ScriptedLinks {
    pub inner: MemoryLinkIndex,
    pub scripts: HashMap<ElementId, Script>,
    pub gauge: Arc<Gauge>,
}

impl ScriptedLinks {
    pub fn wrap(inner: MemoryLinkIndex) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn script(mut self, id: &str, script: Script) -> Self {
        self.scripts.insert(ElementId::new(id), script);
        self
    }
}

#[async_trait]
impl LinkIndex for ScriptedLinks {
    async fn links(&self, observation: &ElementId) -> StoreResult<Vec<Link>> {
        self.gauge.enter(observation);
        let result = match play(self.scripts.get(observation), observation).await {
            Ok(true) => Ok(Vec::new()),
            Ok(false) => self.inner.links(observation).await,
            Err(err) => Err(err),
        };
        self.gauge.leave();
        result
    }
}

pub fn delayed(delay_ms: u64) -> Script {
    Script {
        delay_ms,
        ..Script::default()
    }
}

pub fn failing(delay_ms: u64, message: &str) -> Script {
    Script {
        delay_ms,
        fail: Some(message.to_string()),
        empty: false,
    }
}

pub fn empty() -> Script {
    Script {
        empty: true,
        ..Script::default()
    }
}
