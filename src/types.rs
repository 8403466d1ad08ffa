//! Shared types and data structures for the contract analysis engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ── Canonical graph ───────────────────────────────────────────────────────────

/// A single node in the canonical graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Node type, e.g. `Contract`, `Clause`, `PaymentDeadline`.
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Node {
    /// Resolve the node's effective type: the top-level `type` field when
    /// non-empty, otherwise a `type` property. Extraction pipelines put the
    /// type in either place.
    pub fn effective_type(&self) -> Option<&str> {
        if !self.node_type.is_empty() {
            return Some(&self.node_type);
        }
        self.properties.get("type").and_then(Value::as_str)
    }

    /// Property lookup that treats JSON `null` as absent.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).filter(|v| !v.is_null())
    }
}

/// A directed relationship between two nodes. Multiple relationships between
/// the same pair are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub rel_type: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// The single normalized node/relationship representation all analyzers
/// operate on. Produced fresh per analysis call; never persisted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl CanonicalGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.relationships.is_empty()
    }
}

// ── Rule engine output ────────────────────────────────────────────────────────

/// Which structural rule produced a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    #[serde(rename = "PAYMENT_CONFLICT")]
    PaymentConflict,
    #[serde(rename = "AMOUNT_INCONSISTENCY")]
    AmountInconsistency,
    #[serde(rename = "MISSING_CLAUSES")]
    MissingClauses,
    #[serde(rename = "CIRCULAR_DEPENDENCY")]
    CircularDependency,
}

/// Severity of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// One structured finding emitted by the rule engine. Immutable once
/// produced; consumed by the caller only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub rule: RuleKind,
    /// Ids of the nodes implicated in the finding.
    pub nodes: Vec<String>,
    pub reason: String,
    pub severity: Severity,
    /// Rule-specific supporting data.
    pub details: Value,
}

/// Derived counts over a flag list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub total_flags: usize,
    pub high_severity: usize,
    pub medium_severity: usize,
    pub nodes_analyzed: usize,
    pub relationships_analyzed: usize,
}

/// Output of one rule engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesReport {
    pub flags: Vec<Flag>,
    pub summary: RuleSummary,
}

// ── Contradiction finder output ───────────────────────────────────────────────

/// One side of a pairwise contradiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One structured finding emitted by the contradiction finder, always a
/// pairwise comparison with `clause1.id < clause2.id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contradiction {
    pub contract_id: String,
    pub contradiction_type: String,
    pub clause1: ClauseRef,
    pub clause2: ClauseRef,
}

/// Output of one contradiction scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionReport {
    pub contradictions: Vec<Contradiction>,
    pub count: usize,
}

// ── Constraint checker input/output ───────────────────────────────────────────

/// A temporal interval; either bound may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalFact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_day: Option<i64>,
}

/// Caller-supplied numeric/temporal data to be checked for joint
/// satisfiability. All sub-maps optional; absence means "no constraints of
/// that kind". BTreeMap keeps variable creation order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintFactSet {
    #[serde(default)]
    pub deadlines: BTreeMap<String, i64>,
    #[serde(default)]
    pub amounts: BTreeMap<String, f64>,
    #[serde(default)]
    pub temporal: BTreeMap<String, TemporalFact>,
    #[serde(default)]
    pub custom_constraints: BTreeMap<String, String>,
}

impl ConstraintFactSet {
    /// `true` when no fact category carries any entry.
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
            && self.amounts.is_empty()
            && self.temporal.is_empty()
            && self.custom_constraints.is_empty()
    }
}

/// Three-way satisfiability outcome at the operation layer. Callers must
/// branch on all three; `Unknown` is never coerced to sat or unsat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown,
}

/// Output of one constraint check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Convenience boolean: `result == SatResult::Sat`.
    pub sat: bool,
    pub result: SatResult,
    /// Variable names in creation order.
    pub variables: Vec<String>,
    /// Number of tracked consistency constraints (pins excluded).
    pub constraints_count: usize,
    pub explanation: String,
    /// Satisfying assignment, present iff `result` is `Sat`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<BTreeMap<String, String>>,
    /// Minimal conflicting constraint names, present when `result` is
    /// `Unsat` and core extraction succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsat_core: Option<Vec<String>>,
}
