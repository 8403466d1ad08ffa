//! Tests for [`contract_analysis::normalize`]
//!
//! Exercises the two accepted input shapes (tree and canonical) and the
//! idempotency guarantee: re-normalizing an already-canonical graph changes
//! nothing.

use contract_analysis::normalize::normalize;
use contract_analysis::types::CanonicalGraph;
use serde_json::json;

// ── Tree shape ────────────────────────────────────────────────────────────────

#[test]
fn test_tree_shape_synthesizes_has_clause_relationships() {
    let raw = json!({
        "id": "ct-1",
        "title": "Supply agreement",
        "has_clause": [
            {"id": "cl-1", "_type": "PaymentDeadline", "deadline_days": 30},
            {"id": "cl-2", "_type": "DeliveryDate", "delivery_day": 14},
        ],
    });

    let graph = normalize(&raw);

    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.nodes[0].id, "ct-1");
    assert_eq!(graph.nodes[0].node_type, "Contract");
    assert_eq!(graph.nodes[1].node_type, "PaymentDeadline");
    assert_eq!(graph.nodes[2].node_type, "DeliveryDate");

    assert_eq!(graph.relationships.len(), 2);
    for rel in &graph.relationships {
        assert_eq!(rel.source, "ct-1");
        assert_eq!(rel.rel_type, "HAS_CLAUSE");
    }
    assert_eq!(graph.relationships[0].target, "cl-1");
    assert_eq!(graph.relationships[1].target, "cl-2");
}

#[test]
fn test_tree_children_without_type_hint_default_to_clause() {
    let raw = json!({
        "id": "ct-1",
        "has_clause": [{"id": "cl-1", "text": "net 30"}],
    });

    let graph = normalize(&raw);
    assert_eq!(graph.nodes[1].node_type, "Clause");
}

#[test]
fn test_tree_preserves_child_order() {
    let raw = json!({
        "id": "ct-1",
        "has_clause": [
            {"id": "cl-3"},
            {"id": "cl-1"},
            {"id": "cl-2"},
        ],
    });

    let graph = normalize(&raw);
    let targets: Vec<&str> = graph
        .relationships
        .iter()
        .map(|r| r.target.as_str())
        .collect();
    assert_eq!(targets, vec!["cl-3", "cl-1", "cl-2"]);
}

// ── Canonical shape ───────────────────────────────────────────────────────────

#[test]
fn test_canonical_shape_passes_through() {
    let raw = json!({
        "nodes": [
            {"id": "n1", "type": "Contract", "properties": {"title": "A"}},
            {"id": "n2", "type": "PaymentDeadline",
             "properties": {"deadline_days": 30}},
        ],
        "relationships": [
            {"source": "n1", "target": "n2", "type": "HAS_CLAUSE"},
        ],
    });

    let graph = normalize(&raw);
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.relationships.len(), 1);
    assert_eq!(graph.nodes[1].properties["deadline_days"], json!(30));
}

#[test]
fn test_missing_arrays_default_to_empty() {
    let graph = normalize(&json!({"nodes": [{"id": "n1"}]}));
    assert_eq!(graph.nodes.len(), 1);
    assert!(graph.relationships.is_empty());

    let graph = normalize(&json!({"relationships": []}));
    assert!(graph.is_empty());
}

// ── Idempotency ───────────────────────────────────────────────────────────────

#[test]
fn test_normalization_is_idempotent() {
    let raw = json!({
        "id": "ct-1",
        "_type": "Contract",
        "has_clause": [
            {"id": "cl-1", "_type": "PaymentDeadline", "deadline_days": 30},
            {"id": "cl-2", "_type": "TerminationClause", "notice_days": 60},
        ],
    });

    let first = normalize(&raw);
    let reserialized = serde_json::to_value(&first).expect("canonical graph serializes");
    let second = normalize(&reserialized);

    assert_eq!(first, second);
}

#[test]
fn test_empty_and_unrecognized_input_never_fails() {
    assert!(normalize(&json!(null)).is_empty());
    assert!(normalize(&json!({})).is_empty());
    assert!(normalize(&json!("not a graph")).is_empty());
    assert_eq!(normalize(&json!({})), CanonicalGraph::default());
}
