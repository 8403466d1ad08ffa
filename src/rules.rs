//! Rule engine — four structural consistency rules over a canonical graph.
//!
//! All four rules run unconditionally and independently in a fixed order;
//! one rule finding nothing (or hitting missing/malformed data) never blocks
//! another. Each rule degrades to "no flag" rather than raising — absence of
//! applicable data simply yields fewer flags. The whole run is deterministic
//! for a fixed input graph: no hidden state, no randomized iteration.

use std::collections::HashMap;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::{AMOUNT_RATIO_LIMIT, REQUIRED_CLAUSE_TYPES};
use crate::error::AnalysisError;
use crate::normalize::normalize;
use crate::types::{CanonicalGraph, Flag, Node, RuleKind, RuleSummary, RulesReport, Severity};

/// Run every rule over the given raw subgraph document.
///
/// # Errors
/// Returns [`AnalysisError::InputValidation`] when the subgraph is null or
/// an empty object — "couldn't even look" is distinct from "nothing found".
pub fn run_rules(subgraph: &Value) -> Result<RulesReport, AnalysisError> {
    let missing = subgraph.is_null() || subgraph.as_object().is_some_and(Map::is_empty);
    if missing {
        return Err(AnalysisError::InputValidation(
            "subgraph is required".to_string(),
        ));
    }

    let graph = normalize(subgraph);
    Ok(run_rules_canonical(&graph))
}

/// Rule battery over an already-canonical graph.
///
/// Flags appear in fixed rule order: payment conflicts, amount
/// inconsistencies, missing clauses, circular dependencies.
pub fn run_rules_canonical(graph: &CanonicalGraph) -> RulesReport {
    let mut flags = Vec::new();

    flags.extend(payment_conflict(graph));
    flags.extend(amount_inconsistency(graph));
    flags.extend(missing_clauses(graph));
    flags.extend(circular_dependency(graph));

    let summary = summarize(&flags, graph);
    RulesReport { flags, summary }
}

/// Summary counts are derived from the flag list, never computed separately.
fn summarize(flags: &[Flag], graph: &CanonicalGraph) -> RuleSummary {
    RuleSummary {
        total_flags: flags.len(),
        high_severity: flags.iter().filter(|f| f.severity == Severity::High).count(),
        medium_severity: flags
            .iter()
            .filter(|f| f.severity == Severity::Medium)
            .count(),
        nodes_analyzed: graph.nodes.len(),
        relationships_analyzed: graph.relationships.len(),
    }
}

// ── Rule 1: payment deadline conflicts ────────────────────────────────────────

/// Flag when `PaymentDeadline` clauses disagree on `deadline_days`.
///
/// Distinct deadline values map to one representative clause id each (first
/// occurrence wins; later duplicates of a seen value are not tracked). More
/// than one distinct value means the contract cannot honor all of them.
fn payment_conflict(graph: &CanonicalGraph) -> Option<Flag> {
    let payment_clauses: Vec<&Node> = graph
        .nodes
        .iter()
        .filter(|n| n.effective_type() == Some("PaymentDeadline"))
        .collect();

    if payment_clauses.len() < 2 {
        return None;
    }

    // Distinct deadline value → representative clause id, in first-seen order.
    let mut deadlines: Vec<(i64, String)> = Vec::new();
    for clause in &payment_clauses {
        let Some(days) = clause.property("deadline_days").and_then(Value::as_i64) else {
            debug!("payment clause '{}' has no usable deadline_days", clause.id);
            continue;
        };
        if !deadlines.iter().any(|(d, _)| *d == days) {
            deadlines.push((days, clause.id.clone()));
        }
    }

    if deadlines.len() < 2 {
        return None;
    }

    let clause_ids: Vec<String> = deadlines.iter().map(|(_, id)| id.clone()).collect();
    let deadline_values: Vec<i64> = deadlines.iter().map(|(d, _)| *d).collect();

    let mut deadline_map = Map::new();
    for (days, id) in &deadlines {
        deadline_map.insert(days.to_string(), json!(id));
    }

    Some(Flag {
        rule: RuleKind::PaymentConflict,
        nodes: clause_ids,
        reason: format!(
            "Conflicting payment deadlines found: {:?} days",
            deadline_values
        ),
        severity: Severity::High,
        details: json!({
            "deadlines": deadline_map,
            "clause_count": payment_clauses.len(),
        }),
    })
}

// ── Rule 2: amount inconsistencies ────────────────────────────────────────────

/// Flag when numeric amounts across clauses diverge by more than
/// [`AMOUNT_RATIO_LIMIT`].
fn amount_inconsistency(graph: &CanonicalGraph) -> Option<Flag> {
    let mut amounts: Vec<(String, f64)> = Vec::new();
    for node in &graph.nodes {
        let raw = node.property("amount").or_else(|| node.property("value"));
        let Some(raw) = raw else { continue };
        match coerce_amount(raw) {
            Some(amount) => amounts.push((node.id.clone(), amount)),
            None => {
                debug!("node '{}' carries a non-numeric amount; skipping", node.id);
            }
        }
    }

    if amounts.len() < 2 {
        return None;
    }

    amounts.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let min_amount = amounts[0].1;
    let max_amount = amounts[amounts.len() - 1].1;

    if min_amount <= 0.0 || max_amount / min_amount <= AMOUNT_RATIO_LIMIT {
        return None;
    }

    Some(Flag {
        rule: RuleKind::AmountInconsistency,
        nodes: amounts.iter().map(|(id, _)| id.clone()).collect(),
        reason: format!("Large amount discrepancy: ${min_amount} to ${max_amount}"),
        severity: Severity::Medium,
        details: json!({
            "min_amount": min_amount,
            "max_amount": max_amount,
            "ratio": max_amount / min_amount,
        }),
    })
}

/// Coerce a property value to a number, stripping currency symbols and
/// thousands separators from strings. Non-numeric values coerce to `None`.
pub(crate) fn coerce_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | '€' | '£' | ','))
                .collect();
            cleaned.trim().parse::<f64>().ok()
        }
        _ => None,
    }
}

// ── Rule 3: missing required clauses ──────────────────────────────────────────

/// Flag when a contract lacks any of [`REQUIRED_CLAUSE_TYPES`].
fn missing_clauses(graph: &CanonicalGraph) -> Option<Flag> {
    let contract_nodes: Vec<&Node> = graph
        .nodes
        .iter()
        .filter(|n| n.effective_type() == Some("Contract"))
        .collect();

    if contract_nodes.is_empty() {
        return None;
    }

    let mut present: Vec<&str> = graph
        .nodes
        .iter()
        .filter_map(Node::effective_type)
        .filter(|t| *t != "Contract")
        .collect();
    present.sort_unstable();
    present.dedup();

    let missing: Vec<&str> = REQUIRED_CLAUSE_TYPES
        .iter()
        .filter(|required| !present.contains(required))
        .copied()
        .collect();

    if missing.is_empty() {
        return None;
    }

    Some(Flag {
        rule: RuleKind::MissingClauses,
        nodes: contract_nodes.iter().map(|n| n.id.clone()).collect(),
        reason: format!("Missing required clauses: {}", missing.join(", ")),
        severity: Severity::Medium,
        details: json!({
            "missing": missing,
            "present": present,
        }),
    })
}

// ── Rule 4: circular dependencies ─────────────────────────────────────────────

/// Flag the first cycle found in the directed relationship graph.
///
/// Builds an adjacency list from all relationships (relationship type is
/// ignored) and runs depth-first search with white/gray/black coloring.
/// Only the first detected cycle is reported — one flag covers the whole
/// graph.
fn circular_dependency(graph: &CanonicalGraph) -> Option<Flag> {
    if graph.relationships.is_empty() {
        return None;
    }

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut sources: Vec<&str> = Vec::new();
    for rel in &graph.relationships {
        if rel.source.is_empty() || rel.target.is_empty() {
            continue;
        }
        let entry = adjacency.entry(rel.source.as_str()).or_default();
        if entry.is_empty() {
            sources.push(rel.source.as_str());
        }
        entry.push(rel.target.as_str());
    }

    if !has_cycle(&adjacency, &sources) {
        return None;
    }

    Some(Flag {
        rule: RuleKind::CircularDependency,
        nodes: sources.iter().map(|s| s.to_string()).collect(),
        reason: "Circular dependency detected in contract structure".to_string(),
        severity: Severity::High,
        details: json!({
            "graph_size": adjacency.len(),
            "relationship_count": graph.relationships.len(),
        }),
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Iterative DFS cycle detection. A gray neighbor is a back-edge into the
/// current traversal stack, i.e. a cycle.
fn has_cycle(adjacency: &HashMap<&str, Vec<&str>>, sources: &[&str]) -> bool {
    let mut colors: HashMap<&str, Color> = HashMap::new();

    for &start in sources {
        if colors.get(start).copied().unwrap_or(Color::White) != Color::White {
            continue;
        }

        // Stack entries: (node, index of the next child to visit).
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        colors.insert(start, Color::Gray);

        loop {
            let Some(top) = stack.last_mut() else { break };
            let (node, child_idx) = (top.0, top.1);
            top.1 += 1;

            let children = adjacency.get(node).map(Vec::as_slice).unwrap_or_default();
            if child_idx >= children.len() {
                colors.insert(node, Color::Black);
                stack.pop();
                continue;
            }

            let child = children[child_idx];
            match colors.get(child).copied().unwrap_or(Color::White) {
                Color::Gray => return true,
                Color::Black => {}
                Color::White => {
                    colors.insert(child, Color::Gray);
                    stack.push((child, 0));
                }
            }
        }
    }

    false
}

// ── Tests ─────────────────────────────────────────────────────────────────────
