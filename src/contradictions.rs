//! Contradiction finder — pairwise inconsistencies among the clauses of one
//! contract.
//!
//! Two patterns are scanned, in order:
//! 1. payment deadlines: `PaymentDeadline` clauses whose `deadline_days`
//!    disagree;
//! 2. generic values: clauses of the same type whose `value` (or `amount`)
//!    properties disagree.
//!
//! Every contradiction is a pair reported once, with `clause1.id <
//! clause2.id` as the deterministic tie-break. A missing `contract_id` is an
//! input error — "couldn't even query" must not look like "no
//! contradictions".

use serde_json::Value;
use tracing::debug;

use crate::config::{Config, HAS_CLAUSE};
use crate::error::AnalysisError;
use crate::graph_source::GraphSource;
use crate::normalize::normalize;
use crate::types::{CanonicalGraph, ClauseRef, Contradiction, ContradictionReport, Node};

/// Scans one contract's subgraph for pairwise contradictions.
pub struct ContradictionFinder<'a, S: GraphSource> {
    source: &'a S,
    depth: u32,
}

impl<'a, S: GraphSource> ContradictionFinder<'a, S> {
    pub fn new(config: &Config, source: &'a S) -> Self {
        Self {
            source,
            depth: config.subgraph_depth,
        }
    }

    /// Fetch, normalize and scan the subgraph of `contract_id`.
    ///
    /// # Errors
    /// - [`AnalysisError::InputValidation`] when `contract_id` is empty.
    /// - [`AnalysisError::GraphSource`] when the backend fetch fails.
    pub fn find(&self, contract_id: &str) -> Result<ContradictionReport, AnalysisError> {
        if contract_id.trim().is_empty() {
            return Err(AnalysisError::InputValidation(
                "contract_id is required".to_string(),
            ));
        }

        let raw = self.source.fetch_subgraph(contract_id, self.depth)?;
        let graph = normalize(&raw);

        let clauses = contract_clauses(&graph, contract_id);
        debug!(
            "contract '{}': {} attached clause(s) in scope",
            contract_id,
            clauses.len()
        );

        let mut contradictions = find_payment_contradictions(contract_id, &clauses);
        contradictions.extend(find_value_contradictions(contract_id, &clauses));

        let count = contradictions.len();
        Ok(ContradictionReport {
            contradictions,
            count,
        })
    }
}

// ── Clause selection ──────────────────────────────────────────────────────────

/// Clauses attached to the contract via a `HAS_CLAUSE` relationship, in
/// relationship order.
fn contract_clauses<'g>(graph: &'g CanonicalGraph, contract_id: &str) -> Vec<&'g Node> {
    graph
        .relationships
        .iter()
        .filter(|rel| rel.rel_type == HAS_CLAUSE && rel.source == contract_id)
        .filter_map(|rel| graph.nodes.iter().find(|n| n.id == rel.target))
        .collect()
}

// ── Pattern 1: payment deadlines ──────────────────────────────────────────────

fn find_payment_contradictions(contract_id: &str, clauses: &[&Node]) -> Vec<Contradiction> {
    let deadlines: Vec<(&Node, i64)> = clauses
        .iter()
        .filter(|n| n.effective_type() == Some("PaymentDeadline"))
        .filter_map(|n| {
            n.property("deadline_days")
                .and_then(Value::as_i64)
                .map(|days| (*n, days))
        })
        .collect();

    let mut found = Vec::new();
    for i in 0..deadlines.len() {
        for j in (i + 1)..deadlines.len() {
            // Deterministic tie-break: report each unordered pair once with
            // clause1.id < clause2.id.
            let (first, second) = if deadlines[i].0.id <= deadlines[j].0.id {
                (deadlines[i], deadlines[j])
            } else {
                (deadlines[j], deadlines[i])
            };
            if first.1 == second.1 {
                continue;
            }
            found.push(Contradiction {
                contract_id: contract_id.to_string(),
                contradiction_type: "PaymentDeadline".to_string(),
                clause1: deadline_ref(first.0, first.1),
                clause2: deadline_ref(second.0, second.1),
            });
        }
    }
    found
}

fn deadline_ref(node: &Node, days: i64) -> ClauseRef {
    ClauseRef {
        id: node.id.clone(),
        deadline_days: Some(days),
        value: None,
        description: description_of(node),
    }
}

// ── Pattern 2: generic same-type value mismatches ─────────────────────────────

fn find_value_contradictions(contract_id: &str, clauses: &[&Node]) -> Vec<Contradiction> {
    let valued: Vec<(&Node, &str, &Value)> = clauses
        .iter()
        .filter_map(|n| {
            let clause_type = n.effective_type()?;
            let value = n.property("value").or_else(|| n.property("amount"))?;
            Some((*n, clause_type, value))
        })
        .collect();

    let mut found = Vec::new();
    for i in 0..valued.len() {
        for j in (i + 1)..valued.len() {
            let (first, second) = if valued[i].0.id <= valued[j].0.id {
                (valued[i], valued[j])
            } else {
                (valued[j], valued[i])
            };
            if first.1 != second.1 || first.2 == second.2 {
                continue;
            }
            found.push(Contradiction {
                contract_id: contract_id.to_string(),
                contradiction_type: first.1.to_string(),
                clause1: value_ref(first.0, first.2),
                clause2: value_ref(second.0, second.2),
            });
        }
    }
    found
}

fn value_ref(node: &Node, value: &Value) -> ClauseRef {
    ClauseRef {
        id: node.id.clone(),
        deadline_days: None,
        value: Some(value.clone()),
        description: description_of(node),
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn description_of(node: &Node) -> Option<String> {
    node.property("description")
        .and_then(Value::as_str)
        .map(str::to_string)
}
