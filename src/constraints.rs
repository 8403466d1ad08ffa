//! Constraint checker — encodes a fact set as a satisfiability problem and
//! reports SAT with a model, UNSAT with an explanation, or UNKNOWN.
//!
//! Encoding rules (each category independent; an absent category contributes
//! nothing):
//! - deadlines: one pinned integer variable per id, plus a pairwise
//!   "reasonable consistency" disjunction `(a-b<=7) OR (b-a<=7)`. KNOWN
//!   LOOSE CONSTRAINT: the disjunction holds for any two integers, so it can
//!   never make a fact set unsatisfiable on its own. This mirrors the
//!   long-standing encoding and is preserved on purpose; tightening it to
//!   `|a-b| <= 7` would change observable outcomes and needs a product
//!   decision first.
//! - amounts: one pinned real variable per id, each `> 0`, plus pairwise
//!   ratio bounds `0.5*b <= a <= 2.0*b` in linear form.
//! - temporal: `start_<id>`/`end_<id>` integer variables, pinned where a
//!   bound is given, with `end >= start` always asserted.
//! - custom: expressions parsed by an explicit grammar (`identifier '>'
//!   integer-or-identifier`); anything else is an input error rather than
//!   being silently ignored.
//!
//! Pins are named assertions (`pin_<var>`) so an unsat core can name the
//! pinned facts that conflict; tracked consistency constraints are named
//! `c_<index>_<kind>`. Unsat cores are extracted by deletion-based
//! minimization, each probe running a fresh, fully independent solver.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::config::{AMOUNT_RATIO_FLOOR, AMOUNT_RATIO_LIMIT, Config, DEADLINE_TOLERANCE_DAYS};
use crate::error::AnalysisError;
use crate::solver::{Budget, CmpOp, Domain, Formula, LinExpr, Solver, VarId, Verdict};
use crate::types::{CheckReport, ConstraintFactSet, SatResult};

// ── Public entry point ────────────────────────────────────────────────────────

/// Checks fact sets for joint satisfiability under the configured solver
/// budget.
pub struct ConstraintChecker<'a> {
    config: &'a Config,
}

impl<'a> ConstraintChecker<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Encode `facts` and resolve satisfiability.
    ///
    /// # Errors
    /// - [`AnalysisError::InputValidation`] when the fact set is empty or a
    ///   custom constraint fails to parse.
    pub fn check(&self, facts: &ConstraintFactSet) -> Result<CheckReport, AnalysisError> {
        if facts.is_empty() {
            return Err(AnalysisError::InputValidation(
                "facts is required".to_string(),
            ));
        }

        let encoding = encode(facts)?;
        let variables = encoding.variable_names();
        let constraints_count = encoding.tracked_count();

        let solver = encoding.build_solver(None);
        let mut budget = Budget::new(self.config.solver_step_budget);
        let verdict = solver.check(&mut budget);

        let report = match verdict {
            Verdict::Sat(model) => {
                let model: BTreeMap<String, String> = model
                    .into_iter()
                    .map(|(name, value)| (name, value.to_string()))
                    .collect();
                CheckReport {
                    sat: true,
                    result: SatResult::Sat,
                    variables,
                    constraints_count,
                    explanation: "All constraints are satisfiable".to_string(),
                    model: Some(model),
                    unsat_core: None,
                }
            }
            Verdict::Unsat => {
                // Second, independent pass: minimize the set of named
                // constraints that conflict. Extraction failure falls back
                // to a generic explanation, still UNSAT.
                let core = extract_unsat_core(&encoding, self.config.solver_step_budget);
                let explanation = match &core {
                    Some(names) => format!(
                        "Constraints are unsatisfiable. Conflicting constraints: {:?}",
                        names
                    ),
                    None => "Constraints are unsatisfiable".to_string(),
                };
                CheckReport {
                    sat: false,
                    result: SatResult::Unsat,
                    variables,
                    constraints_count,
                    explanation,
                    model: None,
                    unsat_core: core,
                }
            }
            Verdict::Unknown(reason) => CheckReport {
                sat: false,
                result: SatResult::Unknown,
                variables,
                constraints_count,
                explanation: format!("Could not determine satisfiability: {reason}"),
                model: None,
                unsat_core: None,
            },
        };

        Ok(report)
    }
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// One named assertion in the encoded problem.
struct NamedConstraint {
    name: String,
    formula: Formula,
    /// Pins fix a variable to its given fact value; tracked constraints
    /// carry the consistency semantics and are what `constraints_count`
    /// reports.
    is_pin: bool,
}

/// The encoded problem, kept separate from any [`Solver`] instance so that
/// unsat-core probes can rebuild fresh solvers over constraint subsets.
struct Encoding {
    /// Variable declarations in creation order; [`VarId`]s inside the
    /// formulas index into this list.
    vars: Vec<(String, Domain)>,
    constraints: Vec<NamedConstraint>,
}

impl Encoding {
    fn variable_names(&self) -> Vec<String> {
        self.vars.iter().map(|(name, _)| name.clone()).collect()
    }

    fn tracked_count(&self) -> usize {
        self.constraints.iter().filter(|c| !c.is_pin).count()
    }

    /// Build a fresh solver asserting the given constraint subset (by index
    /// into `constraints`), or every constraint when `subset` is `None`.
    fn build_solver(&self, subset: Option<&[usize]>) -> Solver {
        let mut solver = Solver::new();
        for (name, domain) in &self.vars {
            match domain {
                Domain::Int => solver.int_var(name),
                Domain::Real => solver.real_var(name),
            };
        }
        match subset {
            Some(indices) => {
                for &i in indices {
                    let c = &self.constraints[i];
                    solver.assert_named(&c.name, c.formula.clone());
                }
            }
            None => {
                for c in &self.constraints {
                    solver.assert_named(&c.name, c.formula.clone());
                }
            }
        }
        solver
    }
}

/// Incremental builder tracking variable ids and the tracked-constraint
/// index used in `c_<index>_<kind>` names.
#[derive(Default)]
struct EncodingBuilder {
    vars: Vec<(String, Domain)>,
    by_name: HashMap<String, VarId>,
    constraints: Vec<NamedConstraint>,
    tracked_index: usize,
}

impl EncodingBuilder {
    fn var(&mut self, name: &str, domain: Domain) -> VarId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = VarId(self.vars.len());
        self.vars.push((name.to_string(), domain));
        self.by_name.insert(name.to_string(), id);
        id
    }

    fn pin(&mut self, name: &str, var: VarId, value: f64) {
        self.constraints.push(NamedConstraint {
            name: format!("pin_{name}"),
            formula: Formula::pin(var, value),
            is_pin: true,
        });
    }

    fn track(&mut self, kind: &str, formula: Formula) {
        let name = format!("c_{}_{}", self.tracked_index, kind);
        self.tracked_index += 1;
        self.constraints.push(NamedConstraint {
            name,
            formula,
            is_pin: false,
        });
    }

    fn finish(self) -> Encoding {
        Encoding {
            vars: self.vars,
            constraints: self.constraints,
        }
    }
}

/// Variable names derive from fact ids; dashes are not identifier-safe.
fn sanitize(id: &str) -> String {
    id.replace('-', "_")
}

fn encode(facts: &ConstraintFactSet) -> Result<Encoding, AnalysisError> {
    let mut b = EncodingBuilder::default();

    // Deadlines: pinned ints plus the pairwise tolerance disjunction.
    let mut deadline_vars: Vec<VarId> = Vec::new();
    for (id, days) in &facts.deadlines {
        let name = format!("deadline_{}", sanitize(id));
        let var = b.var(&name, Domain::Int);
        b.pin(&name, var, *days as f64);
        deadline_vars.push(var);
    }
    let tolerance = DEADLINE_TOLERANCE_DAYS as f64;
    for i in 0..deadline_vars.len() {
        for j in (i + 1)..deadline_vars.len() {
            let (a, c) = (deadline_vars[i], deadline_vars[j]);
            b.track(
                "deadline_consistency",
                Formula::Or(vec![
                    Formula::cmp(
                        LinExpr::var(a).plus_term(-1.0, c).plus_const(-tolerance),
                        CmpOp::Le,
                    ),
                    Formula::cmp(
                        LinExpr::var(c).plus_term(-1.0, a).plus_const(-tolerance),
                        CmpOp::Le,
                    ),
                ]),
            );
        }
    }

    // Amounts: pinned positive reals plus pairwise ratio bounds.
    let mut amount_vars: Vec<VarId> = Vec::new();
    for (id, value) in &facts.amounts {
        let name = format!("amount_{}", sanitize(id));
        let var = b.var(&name, Domain::Real);
        b.pin(&name, var, *value);
        amount_vars.push(var);
    }
    for &var in &amount_vars {
        b.track("positive_amount", Formula::cmp(LinExpr::var(var), CmpOp::Gt));
    }
    for i in 0..amount_vars.len() {
        for j in (i + 1)..amount_vars.len() {
            let (a, c) = (amount_vars[i], amount_vars[j]);
            // 0.5 <= a/c <= 2.0, linearized against the pinned positive c.
            b.track(
                "amount_consistency",
                Formula::And(vec![
                    Formula::cmp(
                        LinExpr::var(a).plus_term(-AMOUNT_RATIO_FLOOR, c),
                        CmpOp::Ge,
                    ),
                    Formula::cmp(
                        LinExpr::var(a).plus_term(-AMOUNT_RATIO_LIMIT, c),
                        CmpOp::Le,
                    ),
                ]),
            );
        }
    }

    // Temporal: pin whichever bounds are given; always order the interval.
    for (id, interval) in &facts.temporal {
        let start_name = format!("start_{}", sanitize(id));
        let end_name = format!("end_{}", sanitize(id));
        let start = b.var(&start_name, Domain::Int);
        let end = b.var(&end_name, Domain::Int);

        if let Some(day) = interval.start_day {
            b.pin(&start_name, start, day as f64);
        }
        if let Some(day) = interval.end_day {
            b.pin(&end_name, end, day as f64);
        }

        b.track(
            "temporal_order",
            Formula::cmp(LinExpr::var(end).plus_term(-1.0, start), CmpOp::Ge),
        );
    }

    // Custom: typed expressions over fresh or existing integer variables.
    for (id, raw) in &facts.custom_constraints {
        let parsed = parse_custom(raw).map_err(|e| {
            AnalysisError::InputValidation(format!("custom constraint '{id}': {e}"))
        })?;

        let lhs = b.var(&parsed.lhs, Domain::Int);
        let expr = match parsed.rhs {
            Operand::Const(value) => LinExpr::var(lhs).plus_const(-(value as f64)),
            Operand::Var(name) => {
                let rhs = b.var(&name, Domain::Int);
                LinExpr::var(lhs).plus_term(-1.0, rhs)
            }
        };
        b.track(&format!("custom_{id}"), Formula::cmp(expr, CmpOp::Gt));
        debug!("custom constraint '{}' encoded as '{}'", id, raw);
    }

    Ok(b.finish())
}

// ── Custom expression grammar ─────────────────────────────────────────────────

/// Right-hand side of a custom constraint.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Const(i64),
    Var(String),
}

/// Typed form of a custom constraint: `lhs > rhs`.
#[derive(Debug, Clone, PartialEq)]
struct CustomExpr {
    lhs: String,
    rhs: Operand,
}

/// Parse `identifier '>' (integer | identifier)`.
///
/// Unsupported comparators and malformed expressions are rejected with a
/// descriptive message rather than silently ignored.
fn parse_custom(raw: &str) -> Result<CustomExpr, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty expression".to_string());
    }

    for unsupported in [">=", "<=", "==", "!=", "<"] {
        if trimmed.contains(unsupported) {
            return Err(format!(
                "unsupported comparator '{unsupported}'; only '>' is accepted"
            ));
        }
    }

    let mut parts = trimmed.splitn(2, '>');
    let (lhs, rhs) = match (parts.next(), parts.next()) {
        (Some(lhs), Some(rhs)) => (lhs.trim(), rhs.trim()),
        _ => return Err("expected 'identifier > integer-or-identifier'".to_string()),
    };
    if rhs.contains('>') {
        return Err("more than one comparator".to_string());
    }

    if !is_identifier(lhs) {
        return Err(format!("left side '{lhs}' is not a valid identifier"));
    }

    let rhs = if let Ok(value) = rhs.parse::<i64>() {
        Operand::Const(value)
    } else if is_identifier(rhs) {
        Operand::Var(rhs.to_string())
    } else {
        return Err(format!(
            "right side '{rhs}' is neither an integer nor an identifier"
        ));
    };

    Ok(CustomExpr {
        lhs: lhs.to_string(),
        rhs,
    })
}

/// Identifiers: leading letter or underscore, then letters, digits, `_`, `-`.
fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// ── Unsat core extraction ─────────────────────────────────────────────────────

/// Deletion-based minimization over the named constraints.
///
/// Every probe builds a fresh solver with its own budget — no state from the
/// original solve is reused. Returns `None` when extraction cannot confirm
/// an unsat subset (e.g. a probe goes Unknown on the full set), in which
/// case the caller falls back to a generic explanation.
fn extract_unsat_core(encoding: &Encoding, step_budget: u64) -> Option<Vec<String>> {
    let mut active: Vec<usize> = (0..encoding.constraints.len()).collect();

    // Confirm the full tracked set is unsat before minimizing.
    match probe(encoding, &active, step_budget) {
        Verdict::Unsat => {}
        other => {
            warn!(
                "unsat-core extraction aborted: full-set probe was {:?}",
                discriminant_name(&other)
            );
            return None;
        }
    }

    let mut i = 0;
    while i < active.len() {
        let mut candidate = active.clone();
        candidate.remove(i);
        match probe(encoding, &candidate, step_budget) {
            // Still unsat without this constraint: it is not part of the core.
            Verdict::Unsat => active = candidate,
            // Needed for unsatisfiability (or undecidable: keep, stay sound).
            _ => i += 1,
        }
    }

    Some(
        active
            .iter()
            .map(|&i| encoding.constraints[i].name.clone())
            .collect(),
    )
}

fn probe(encoding: &Encoding, subset: &[usize], step_budget: u64) -> Verdict {
    let solver = encoding.build_solver(Some(subset));
    let mut budget = Budget::new(step_budget);
    solver.check(&mut budget)
}

fn discriminant_name(verdict: &Verdict) -> &'static str {
    match verdict {
        Verdict::Sat(_) => "sat",
        Verdict::Unsat => "unsat",
        Verdict::Unknown(_) => "unknown",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
