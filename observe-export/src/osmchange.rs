//! OsmChange XML writer.
//!
//! Writes an `<osmChange version="0.6">` document with one `<create>` block
//! followed by one `<modify>` block. Elements keep their input order within a
//! block and tags are written in key order, so the same input always yields
//! byte-identical output.

use crate::error::{ExportError, ExportResult};
use chrono::SecondsFormat;
use observe_types::{Action, Element, ElementKind};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use serde_json::Value;

/// OsmChange format version written on the root element.
pub const OSMCHANGE_VERSION: &str = "0.6";

/// Serializes classified elements as an OsmChange document.
///
/// Every element must carry an action and be a map feature.
pub fn to_osmchange_xml(elements: &[Element], generator: &str) -> ExportResult<String> {
    for element in elements {
        if element.action.is_none() {
            return Err(ExportError::InvalidEntity(format!(
                "{} {} has no changeset action",
                element.kind, element.id
            )));
        }
        if !element.kind.is_feature() {
            return Err(ExportError::InvalidEntity(format!(
                "{} is an observation, not a map feature",
                element.id
            )));
        }
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut root = BytesStart::new("osmChange");
    root.push_attribute(("version", OSMCHANGE_VERSION));
    root.push_attribute(("generator", generator));
    emit(&mut writer, Event::Start(root))?;

    for action in [Action::Create, Action::Modify] {
        let mut block = elements
            .iter()
            .filter(|e| e.action == Some(action))
            .peekable();
        if block.peek().is_none() {
            continue;
        }
        emit(&mut writer, Event::Start(BytesStart::new(action.as_str())))?;
        for element in block {
            write_element(&mut writer, element)?;
        }
        emit(&mut writer, Event::End(BytesEnd::new(action.as_str())))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("osmChange")))?;
    String::from_utf8(writer.into_inner()).map_err(|e| ExportError::Xml(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> ExportResult<()> {
    let name = element.kind.as_str();
    let id = element.id.to_string();
    let version = element.version.as_ref().map(ToString::to_string);
    let timestamp = element
        .timestamp
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true));
    let lat = element.lat.map(|v| v.to_string());
    let lon = element.lon.map(|v| v.to_string());

    let mut start = BytesStart::new(name);
    start.push_attribute(("id", id.as_str()));
    if let Some(version) = &version {
        start.push_attribute(("version", version.as_str()));
    }
    if let Some(timestamp) = &timestamp {
        start.push_attribute(("timestamp", timestamp.as_str()));
    }
    if element.kind == ElementKind::Node {
        if let Some(lat) = &lat {
            start.push_attribute(("lat", lat.as_str()));
        }
        if let Some(lon) = &lon {
            start.push_attribute(("lon", lon.as_str()));
        }
    }

    let refs = node_refs(element);
    let members = members(element);
    if element.tags.is_empty() && refs.is_empty() && members.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for node in &refs {
        let mut nd = BytesStart::new("nd");
        nd.push_attribute(("ref", node.as_str()));
        emit(writer, Event::Empty(nd))?;
    }
    for (kind, reference, role) in &members {
        let mut member = BytesStart::new("member");
        member.push_attribute(("type", kind.as_str()));
        member.push_attribute(("ref", reference.as_str()));
        member.push_attribute(("role", role.as_str()));
        emit(writer, Event::Empty(member))?;
    }
    for (key, value) in &element.tags {
        let mut tag = BytesStart::new("tag");
        tag.push_attribute(("k", key.as_str()));
        tag.push_attribute(("v", value.as_str()));
        emit(writer, Event::Empty(tag))?;
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

/// Way node references from the store's `nodes` field.
fn node_refs(element: &Element) -> Vec<String> {
    if element.kind != ElementKind::Way {
        return Vec::new();
    }
    match element.extra.get("nodes") {
        Some(Value::Array(nodes)) => nodes.iter().filter_map(scalar).collect(),
        _ => Vec::new(),
    }
}

/// Relation members from the store's `members` field as (type, ref, role).
fn members(element: &Element) -> Vec<(String, String, String)> {
    if element.kind != ElementKind::Relation {
        return Vec::new();
    }
    let Some(Value::Array(members)) = element.extra.get("members") else {
        return Vec::new();
    };
    members
        .iter()
        .filter_map(|member| {
            let kind = member.get("type").and_then(scalar)?;
            let reference = member.get("ref").and_then(scalar)?;
            let role = member.get("role").and_then(scalar).unwrap_or_default();
            Some((kind, reference, role))
        })
        .collect()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> ExportResult<()> {
    writer
        .write_event(event)
        .map_err(|e| ExportError::Xml(e.to_string()))
}
