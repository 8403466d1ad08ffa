//! Graph normalizer — converts heterogeneous clause-graph shapes into one
//! [`CanonicalGraph`].
//!
//! Two input shapes are accepted:
//! - canonical `{nodes: [...], relationships: [...]}` arrays, passed through
//!   unchanged (missing arrays default to empty);
//! - a "tree" shape where the root object embeds its clause objects under a
//!   `has_clause` key, each child implicitly forming a `HAS_CLAUSE`
//!   relationship from the root.
//!
//! Normalization never fails. Unrecognized or empty input yields an empty
//! graph so the downstream rules degrade gracefully instead of aborting an
//! entire analysis on one malformed subgraph. Shape sniffing happens here
//! and only here — downstream components consume the canonical form and
//! never branch on raw shape again.

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::HAS_CLAUSE;
use crate::types::{CanonicalGraph, Node, Relationship};

/// Key under which the tree shape embeds its child clauses.
const EMBEDDED_CHILDREN_KEY: &str = "has_clause";

/// Key carrying the type hint in tree-shaped documents.
const TYPE_HINT_KEY: &str = "_type";

/// Normalize an arbitrary clause-graph document into canonical form.
pub fn normalize(raw: &Value) -> CanonicalGraph {
    let Some(obj) = raw.as_object() else {
        return CanonicalGraph::default();
    };

    if obj.contains_key(EMBEDDED_CHILDREN_KEY) {
        return normalize_tree(obj);
    }

    normalize_canonical(obj)
}

// ── Tree shape ────────────────────────────────────────────────────────────────

/// Build one root node, one node per embedded child, and one `HAS_CLAUSE`
/// relationship per child. Property maps are copied verbatim minus internal
/// bookkeeping keys (`_`-prefixed) and the embedded-children key itself.
fn normalize_tree(obj: &Map<String, Value>) -> CanonicalGraph {
    let mut graph = CanonicalGraph::default();

    let Some(root_id) = string_id(obj.get("id")) else {
        debug!("tree-shaped input has no root id; yielding empty graph");
        return graph;
    };

    let root_type = type_hint(obj).unwrap_or("Contract");
    graph.nodes.push(Node {
        id: root_id.clone(),
        node_type: root_type.to_string(),
        properties: scrub_properties(obj),
    });

    let children = obj
        .get(EMBEDDED_CHILDREN_KEY)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for child in children {
        let Some(child_obj) = child.as_object() else {
            debug!("skipping non-object clause entry");
            continue;
        };
        let Some(child_id) = string_id(child_obj.get("id")) else {
            debug!("skipping clause entry without id");
            continue;
        };

        let child_type = type_hint(child_obj).unwrap_or("Clause");
        graph.nodes.push(Node {
            id: child_id.clone(),
            node_type: child_type.to_string(),
            properties: scrub_properties(child_obj),
        });

        graph.relationships.push(Relationship {
            source: root_id.clone(),
            target: child_id,
            rel_type: HAS_CLAUSE.to_string(),
            properties: Map::new(),
        });
    }

    graph
}

// ── Canonical shape ───────────────────────────────────────────────────────────

/// Pass through `nodes`/`relationships` arrays, dropping entries that do not
/// deserialize (data errors are recovered locally, never raised).
fn normalize_canonical(obj: &Map<String, Value>) -> CanonicalGraph {
    let nodes = obj
        .get("nodes")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(|v| match serde_json::from_value::<Node>(v.clone()) {
            Ok(node) => Some(node),
            Err(e) => {
                debug!("skipping malformed node: {}", e);
                None
            }
        })
        .collect();

    let relationships = obj
        .get("relationships")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(|v| match serde_json::from_value::<Relationship>(v.clone()) {
            Ok(rel) => Some(rel),
            Err(e) => {
                debug!("skipping malformed relationship: {}", e);
                None
            }
        })
        .collect();

    CanonicalGraph {
        nodes,
        relationships,
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// Node ids may arrive as strings or numbers; anything else is unusable.
fn string_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn type_hint(obj: &Map<String, Value>) -> Option<&str> {
    obj.get(TYPE_HINT_KEY).and_then(Value::as_str)
}

/// Copy properties, dropping `_`-prefixed bookkeeping keys, the embedded
/// children, and the id (which lives on the node itself).
fn scrub_properties(obj: &Map<String, Value>) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| !k.starts_with('_') && *k != EMBEDDED_CHILDREN_KEY && *k != "id")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
