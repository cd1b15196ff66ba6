use observe_store::{ElementStore, LinkIndex, MemoryLinkIndex, MemoryStore, StoreError};
use observe_types::{parse_timestamp, Element, ElementId, Link, Version};
use tokio_test::block_on;

// ── MemoryStore ───────────────────────────────────────────────────

#[test]
fn unknown_id_is_not_found() {
    let store = MemoryStore::new();
    let err = block_on(store.get_element(&ElementId::new("missing"))).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, StoreError::NotFound(id) if id == "missing"));
}

#[test]
fn inserts_accumulate_as_forks() {
    let store = MemoryStore::new();
    store.insert(Element::node("1").with_version("a"));
    store.insert(Element::node("1").with_version("b"));
    store.insert(Element::node("2").with_version("c"));

    assert_eq!(store.len(), 2);
    let forks = block_on(store.get_element(&ElementId::new("1"))).unwrap();
    let versions: Vec<_> = forks.iter().map(|f| f.version.clone().unwrap()).collect();
    assert_eq!(versions, vec![Version::new("a"), Version::new("b")]);
}

#[test]
fn remove_returns_forks() {
    let store = MemoryStore::new();
    store.insert_all([Element::node("1"), Element::node("1")]);
    assert_eq!(store.remove(&ElementId::new("1")).len(), 2);
    assert!(store.is_empty());
    assert!(store.remove(&ElementId::new("1")).is_empty());
}

#[test]
fn from_json_loads_documents() {
    let json = r#"[
        {"id": "1", "type": "node", "version": "a", "lat": 1.0, "lon": 2.0, "tags": {}},
        {"id": "1", "type": "node", "version": "b", "tags": {"name": "x"}},
        {"id": "o1", "type": "observation", "tags": {"note": "hi"}}
    ]"#;
    let store = MemoryStore::from_json(json).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(block_on(store.get_element(&ElementId::new("1"))).unwrap().len(), 2);
}

#[test]
fn from_json_accepts_date_only_timestamps() {
    let json = r#"[
        {"id": "1", "type": "node", "version": "a", "timestamp": "2017-03-01"},
        {"id": "1", "type": "node", "version": "b", "timestamp": "2017-03-01T09:30:00Z"}
    ]"#;
    let store = MemoryStore::from_json(json).unwrap();
    let forks = block_on(store.get_element(&ElementId::new("1"))).unwrap();
    assert_eq!(forks[0].timestamp, parse_timestamp("2017-03-01T00:00:00Z"));
    assert!(forks[0].timestamp < forks[1].timestamp);
}

#[test]
fn from_json_rejects_bad_documents() {
    let err = MemoryStore::from_json(r#"[{"id": "1"}]"#).unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
}

// ── MemoryLinkIndex ───────────────────────────────────────────────

#[test]
fn links_for_unknown_observation_are_empty() {
    let index = MemoryLinkIndex::new();
    let links = block_on(index.links(&ElementId::new("o1"))).unwrap();
    assert!(links.is_empty());
}

#[test]
fn links_keep_index_order() {
    let index = MemoryLinkIndex::new();
    index.insert(Link::new("o1", "n2"));
    index.insert(Link::new("o2", "n9"));
    index.insert(Link::new("o1", "n1"));

    let links = block_on(index.links(&ElementId::new("o1"))).unwrap();
    assert_eq!(links, vec![Link::new("o1", "n2"), Link::new("o1", "n1")]);
    assert_eq!(index.len(), 3);
}

#[test]
fn index_observation_reads_links_field() {
    let index = MemoryLinkIndex::new();
    index.index_observation(&Element::observation("o1").with_links(["-n1", "42"]));
    assert!(!index.is_empty());

    let links = block_on(index.links(&ElementId::new("o1"))).unwrap();
    assert_eq!(links, vec![Link::new("o1", "-n1"), Link::new("o1", "42")]);
}
