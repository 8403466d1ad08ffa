//! Linear-arithmetic satisfiability core.
//!
//! Supports integer and real variables, linear expressions, comparison
//! atoms, `And`/`Or` combinators, model extraction, and named assertions.
//! Satisfiability is decided by interval bounds-propagation to fixpoint,
//! unit simplification of disjunctions against the propagated bounds, and
//! depth-first branching over disjuncts that stay undetermined.
//!
//! # Soundness policy
//! - `Unsat` is reported only from a propagation-derived empty interval or
//!   from every disjunct of a disjunction being provably violated.
//! - `Sat` is reported only with a concrete assignment that has been
//!   re-verified against every assertion.
//! - Everything else — budget exhaustion, an assignment the greedy search
//!   cannot complete — resolves to `Unknown`, never coerced to either side.
//!
//! Every solver instance is request-scoped: built, checked once, and
//! discarded. Callers needing a second opinion (e.g. unsat-core
//! minimization) construct a fresh instance.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

// ── Variables ─────────────────────────────────────────────────────────────────

/// Handle to a declared variable. Ids are assigned in declaration order and
/// are stable across solver instances that declare the same variables in the
/// same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub usize);

/// Variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Int,
    Real,
}

#[derive(Debug, Clone)]
struct VarInfo {
    name: String,
    domain: Domain,
}

/// One concrete value in a satisfying assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelValue {
    Int(i64),
    Real(f64),
}

impl fmt::Display for ModelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelValue::Int(v) => write!(f, "{v}"),
            ModelValue::Real(v) => write!(f, "{v}"),
        }
    }
}

// ── Expressions and formulas ──────────────────────────────────────────────────

/// A linear expression: `sum(coef * var) + constant`.
#[derive(Debug, Clone, Default)]
pub struct LinExpr {
    pub terms: Vec<(f64, VarId)>,
    pub constant: f64,
}

impl LinExpr {
    pub fn var(v: VarId) -> Self {
        Self {
            terms: vec![(1.0, v)],
            constant: 0.0,
        }
    }

    pub fn term(coef: f64, v: VarId) -> Self {
        Self {
            terms: vec![(coef, v)],
            constant: 0.0,
        }
    }

    pub fn plus_term(mut self, coef: f64, v: VarId) -> Self {
        self.terms.push((coef, v));
        self
    }

    pub fn plus_const(mut self, c: f64) -> Self {
        self.constant += c;
        self
    }

    fn eval(&self, assignment: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(coef, v)| coef * assignment[v.0])
            .sum::<f64>()
            + self.constant
    }
}

/// Comparison operator relating a [`LinExpr`] to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// expr <= 0
    Le,
    /// expr < 0
    Lt,
    /// expr >= 0
    Ge,
    /// expr > 0
    Gt,
    /// expr == 0
    Eq,
}

/// A single comparison atom: `expr op 0`.
#[derive(Debug, Clone)]
pub struct Atom {
    pub expr: LinExpr,
    pub op: CmpOp,
}

impl Atom {
    pub fn new(expr: LinExpr, op: CmpOp) -> Self {
        Self { expr, op }
    }
}

/// Boolean combination of atoms.
#[derive(Debug, Clone)]
pub enum Formula {
    Atom(Atom),
    And(Vec<Formula>),
    Or(Vec<Formula>),
}

impl Formula {
    /// `expr op 0` leaf.
    pub fn cmp(expr: LinExpr, op: CmpOp) -> Self {
        Formula::Atom(Atom::new(expr, op))
    }

    /// `var == value` pin.
    pub fn pin(v: VarId, value: f64) -> Self {
        Formula::cmp(LinExpr::var(v).plus_const(-value), CmpOp::Eq)
    }
}

// ── Verdict and budget ────────────────────────────────────────────────────────

/// Three-way satisfiability verdict.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Sat(BTreeMap<String, ModelValue>),
    Unsat,
    Unknown(String),
}

/// Work budget for one `check` call, counted in propagation steps and branch
/// expansions. The solver resolves to `Unknown` when it runs out rather than
/// hanging.
#[derive(Debug, Clone)]
pub struct Budget {
    remaining: u64,
}

impl Budget {
    pub fn new(steps: u64) -> Self {
        Self { remaining: steps }
    }

    /// Spend `n` units; `false` when the budget is exhausted.
    fn spend(&mut self, n: u64) -> bool {
        if self.remaining < n {
            self.remaining = 0;
            return false;
        }
        self.remaining -= n;
        true
    }
}

// ── Intervals ─────────────────────────────────────────────────────────────────

/// Closed-or-open interval over f64, with strictness flags for open ends.
#[derive(Debug, Clone, Copy)]
struct Interval {
    lo: f64,
    hi: f64,
    lo_strict: bool,
    hi_strict: bool,
}

impl Interval {
    fn unbounded() -> Self {
        Self {
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
            lo_strict: false,
            hi_strict: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.lo > self.hi || (self.lo == self.hi && (self.lo_strict || self.hi_strict))
    }

    fn is_point(&self) -> bool {
        self.lo == self.hi && !self.lo_strict && !self.hi_strict
    }
}

/// Tri-state status of an atom or disjunct under current bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    True,
    False,
    Undetermined,
}

// ── Solver ────────────────────────────────────────────────────────────────────

/// Absolute tolerance used when verifying a candidate model.
const VERIFY_EPS: f64 = 1e-6;

/// A request-scoped satisfiability problem.
#[derive(Debug, Default)]
pub struct Solver {
    vars: Vec<VarInfo>,
    by_name: HashMap<String, VarId>,
    assertions: Vec<(Option<String>, Formula)>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or look up) an integer variable.
    pub fn int_var(&mut self, name: &str) -> VarId {
        self.declare(name, Domain::Int)
    }

    /// Declare (or look up) a real variable.
    pub fn real_var(&mut self, name: &str) -> VarId {
        self.declare(name, Domain::Real)
    }

    fn declare(&mut self, name: &str, domain: Domain) -> VarId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = VarId(self.vars.len());
        self.vars.push(VarInfo {
            name: name.to_string(),
            domain,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Variable names in declaration order.
    pub fn variable_names(&self) -> Vec<String> {
        self.vars.iter().map(|v| v.name.clone()).collect()
    }

    /// Add an unnamed assertion.
    pub fn assert(&mut self, formula: Formula) {
        self.assertions.push((None, formula));
    }

    /// Add a named assertion (for unsat-core style accounting by callers).
    pub fn assert_named(&mut self, name: &str, formula: Formula) {
        self.assertions.push((Some(name.to_string()), formula));
    }

    /// Decide satisfiability of the asserted conjunction.
    pub fn check(&self, budget: &mut Budget) -> Verdict {
        let mut atoms: Vec<Atom> = Vec::new();
        let mut ors: Vec<Vec<Formula>> = Vec::new();
        for (_, formula) in &self.assertions {
            flatten(formula, &mut atoms, &mut ors);
        }

        let bounds = vec![Interval::unbounded(); self.vars.len()];
        self.solve(atoms, ors, bounds, budget)
    }

    // ── Search ────────────────────────────────────────────────────────────

    fn solve(
        &self,
        mut atoms: Vec<Atom>,
        mut ors: Vec<Vec<Formula>>,
        mut bounds: Vec<Interval>,
        budget: &mut Budget,
    ) -> Verdict {
        // Alternate propagation and disjunction simplification until both
        // stabilize; a simplified disjunct may feed new atoms back in.
        loop {
            match self.propagate(&atoms, &mut bounds, budget) {
                Ok(()) => {}
                Err(verdict) => return verdict,
            }

            match self.simplify_ors(&mut ors, &bounds, budget) {
                Ok(Some((new_atoms, new_ors))) => {
                    atoms.extend(new_atoms);
                    ors.extend(new_ors);
                }
                Ok(None) => break,
                Err(verdict) => return verdict,
            }
        }

        if let Some(branches) = ors.pop() {
            return self.branch(branches, atoms, ors, bounds, budget);
        }

        self.extract_model(&atoms, bounds, budget)
    }

    /// Branch over the alternatives of one undetermined disjunction.
    ///
    /// Any satisfiable branch wins; all-unsat means unsat; an unknown branch
    /// taints an otherwise-unsat result into unknown.
    fn branch(
        &self,
        branches: Vec<Formula>,
        atoms: Vec<Atom>,
        ors: Vec<Vec<Formula>>,
        bounds: Vec<Interval>,
        budget: &mut Budget,
    ) -> Verdict {
        let mut saw_unknown = None;
        for branch in branches {
            if !budget.spend(1) {
                return Verdict::Unknown("solver step budget exhausted".to_string());
            }

            let mut branch_atoms = atoms.clone();
            let mut branch_ors = ors.clone();
            flatten(&branch, &mut branch_atoms, &mut branch_ors);

            match self.solve(branch_atoms, branch_ors, bounds.clone(), budget) {
                Verdict::Sat(model) => return Verdict::Sat(model),
                Verdict::Unsat => {}
                Verdict::Unknown(reason) => saw_unknown = Some(reason),
            }
        }

        match saw_unknown {
            Some(reason) => Verdict::Unknown(reason),
            None => Verdict::Unsat,
        }
    }

    // ── Propagation ───────────────────────────────────────────────────────

    /// Tighten variable intervals from the conjunction of atoms until
    /// fixpoint. `Err` carries the terminal verdict (conflict or budget).
    fn propagate(
        &self,
        atoms: &[Atom],
        bounds: &mut [Interval],
        budget: &mut Budget,
    ) -> Result<(), Verdict> {
        loop {
            let mut progressed = false;

            for atom in atoms {
                if !budget.spend(1) {
                    return Err(Verdict::Unknown(
                        "solver step budget exhausted".to_string(),
                    ));
                }

                for &(coef, var) in &atom.expr.terms {
                    if coef == 0.0 {
                        continue;
                    }
                    if self.tighten(atom, coef, var, bounds)? {
                        progressed = true;
                    }
                }
            }

            if !progressed {
                return Ok(());
            }
        }
    }

    /// Derive a bound on `var` from `atom`, bounding the remaining terms by
    /// their current intervals. Returns `Ok(true)` when a bound tightened.
    fn tighten(
        &self,
        atom: &Atom,
        coef: f64,
        var: VarId,
        bounds: &mut [Interval],
    ) -> Result<bool, Verdict> {
        // expr = coef*var + rest. Bound rest over the other terms.
        let (rest_lo, rest_hi) = rest_range(&atom.expr, var, bounds);

        let mut changed = false;

        // Upper-bounding direction: expr <= 0 (also Eq, Lt).
        if matches!(atom.op, CmpOp::Le | CmpOp::Lt | CmpOp::Eq) && rest_lo.is_finite() {
            let strict = atom.op == CmpOp::Lt;
            // coef*var <= -rest for every admissible rest, so coef*var <= -rest_lo.
            let limit = -rest_lo / coef;
            changed |= if coef > 0.0 {
                apply_upper(&mut bounds[var.0], limit, strict, self.vars[var.0].domain)
            } else {
                apply_lower(&mut bounds[var.0], limit, strict, self.vars[var.0].domain)
            };
        }

        // Lower-bounding direction: expr >= 0 (also Eq, Gt).
        if matches!(atom.op, CmpOp::Ge | CmpOp::Gt | CmpOp::Eq) && rest_hi.is_finite() {
            let strict = atom.op == CmpOp::Gt;
            // coef*var >= -rest for every admissible rest, so coef*var >= -rest_hi.
            let limit = -rest_hi / coef;
            changed |= if coef > 0.0 {
                apply_lower(&mut bounds[var.0], limit, strict, self.vars[var.0].domain)
            } else {
                apply_upper(&mut bounds[var.0], limit, strict, self.vars[var.0].domain)
            };
        }

        if bounds[var.0].is_empty() {
            return Err(Verdict::Unsat);
        }
        Ok(changed)
    }

    // ── Disjunction simplification ────────────────────────────────────────

    /// Resolve disjunctions against current bounds: drop those with a
    /// provably-true branch, prune provably-false branches, and promote
    /// single-branch survivors into the conjunction.
    ///
    /// `Ok(Some(..))` carries promoted atoms/nested-ors (caller must loop);
    /// `Ok(None)` means stable; `Err` is a terminal verdict.
    #[allow(clippy::type_complexity)]
    fn simplify_ors(
        &self,
        ors: &mut Vec<Vec<Formula>>,
        bounds: &[Interval],
        budget: &mut Budget,
    ) -> Result<Option<(Vec<Atom>, Vec<Vec<Formula>>)>, Verdict> {
        let mut promoted_atoms = Vec::new();
        let mut promoted_ors = Vec::new();
        let mut stable = true;

        let mut idx = 0;
        while idx < ors.len() {
            if !budget.spend(1) {
                return Err(Verdict::Unknown(
                    "solver step budget exhausted".to_string(),
                ));
            }

            let statuses: Vec<Status> = ors[idx]
                .iter()
                .map(|branch| formula_status(branch, bounds))
                .collect();

            if statuses.contains(&Status::True) {
                ors.swap_remove(idx);
                stable = false;
                continue;
            }

            let before = ors[idx].len();
            let mut kept: Vec<Formula> = Vec::new();
            for (branch, status) in ors[idx].drain(..).zip(statuses) {
                if status != Status::False {
                    kept.push(branch);
                }
            }

            match kept.len() {
                0 => return Err(Verdict::Unsat),
                1 => {
                    // Promote the lone survivor into the conjunction.
                    let branch = kept.remove(0);
                    flatten(&branch, &mut promoted_atoms, &mut promoted_ors);
                    ors.swap_remove(idx);
                    stable = false;
                }
                n => {
                    if n != before {
                        stable = false;
                    }
                    ors[idx] = kept;
                    idx += 1;
                }
            }
        }

        if stable && promoted_atoms.is_empty() && promoted_ors.is_empty() {
            Ok(None)
        } else {
            Ok(Some((promoted_atoms, promoted_ors)))
        }
    }

    // ── Model extraction ──────────────────────────────────────────────────

    /// Greedily assign every variable from its propagated interval, pinning
    /// and re-propagating after each pick, then verify the full assignment.
    fn extract_model(
        &self,
        atoms: &[Atom],
        mut bounds: Vec<Interval>,
        budget: &mut Budget,
    ) -> Verdict {
        let mut pinned_atoms: Vec<Atom> = atoms.to_vec();

        for (idx, info) in self.vars.iter().enumerate() {
            if bounds[idx].is_point() {
                continue;
            }

            let value = pick_value(&bounds[idx], info.domain);
            bounds[idx] = Interval {
                lo: value,
                hi: value,
                lo_strict: false,
                hi_strict: false,
            };
            pinned_atoms.push(Atom::new(
                LinExpr::var(VarId(idx)).plus_const(-value),
                CmpOp::Eq,
            ));

            match self.propagate(&pinned_atoms, &mut bounds, budget) {
                Ok(()) => {}
                Err(Verdict::Unknown(reason)) => return Verdict::Unknown(reason),
                Err(_) => {
                    // The greedy pick dead-ended; a smarter search might
                    // still find a model, so this is not Unsat.
                    return Verdict::Unknown(
                        "could not complete a satisfying assignment".to_string(),
                    );
                }
            }
        }

        let assignment: Vec<f64> = bounds.iter().map(|iv| iv.lo).collect();
        for atom in atoms {
            if !atom_holds(atom, &assignment) {
                return Verdict::Unknown(
                    "candidate assignment failed verification".to_string(),
                );
            }
        }

        let mut model = BTreeMap::new();
        for (idx, info) in self.vars.iter().enumerate() {
            let value = match info.domain {
                Domain::Int => ModelValue::Int(assignment[idx].round() as i64),
                Domain::Real => ModelValue::Real(assignment[idx]),
            };
            model.insert(info.name.clone(), value);
        }
        Verdict::Sat(model)
    }
}

// ── Free helpers ──────────────────────────────────────────────────────────────

/// Split a formula into conjunctive atoms and pending disjunctions.
fn flatten(formula: &Formula, atoms: &mut Vec<Atom>, ors: &mut Vec<Vec<Formula>>) {
    match formula {
        Formula::Atom(atom) => atoms.push(atom.clone()),
        Formula::And(parts) => {
            for part in parts {
                flatten(part, atoms, ors);
            }
        }
        Formula::Or(branches) => ors.push(branches.clone()),
    }
}

/// Range of `expr` minus the `coef*var` term, over current bounds.
fn rest_range(expr: &LinExpr, var: VarId, bounds: &[Interval]) -> (f64, f64) {
    let mut lo = expr.constant;
    let mut hi = expr.constant;
    for &(coef, v) in &expr.terms {
        if v == var {
            continue;
        }
        let iv = bounds[v.0];
        let (a, b) = if coef >= 0.0 {
            (coef * iv.lo, coef * iv.hi)
        } else {
            (coef * iv.hi, coef * iv.lo)
        };
        lo += a;
        hi += b;
    }
    (lo, hi)
}

/// Range of the whole expression over current bounds.
fn expr_range(expr: &LinExpr, bounds: &[Interval]) -> (f64, f64) {
    let mut lo = expr.constant;
    let mut hi = expr.constant;
    for &(coef, v) in &expr.terms {
        let iv = bounds[v.0];
        let (a, b) = if coef >= 0.0 {
            (coef * iv.lo, coef * iv.hi)
        } else {
            (coef * iv.hi, coef * iv.lo)
        };
        lo += a;
        hi += b;
    }
    (lo, hi)
}

/// Tri-state evaluation of a formula against current bounds.
fn formula_status(formula: &Formula, bounds: &[Interval]) -> Status {
    match formula {
        Formula::Atom(atom) => atom_status(atom, bounds),
        Formula::And(parts) => {
            let mut all_true = true;
            for part in parts {
                match formula_status(part, bounds) {
                    Status::False => return Status::False,
                    Status::Undetermined => all_true = false,
                    Status::True => {}
                }
            }
            if all_true {
                Status::True
            } else {
                Status::Undetermined
            }
        }
        Formula::Or(branches) => {
            let mut all_false = true;
            for branch in branches {
                match formula_status(branch, bounds) {
                    Status::True => return Status::True,
                    Status::Undetermined => all_false = false,
                    Status::False => {}
                }
            }
            if all_false {
                Status::False
            } else {
                Status::Undetermined
            }
        }
    }
}

fn atom_status(atom: &Atom, bounds: &[Interval]) -> Status {
    let (lo, hi) = expr_range(&atom.expr, bounds);
    match atom.op {
        CmpOp::Le => {
            if hi <= 0.0 {
                Status::True
            } else if lo > 0.0 {
                Status::False
            } else {
                Status::Undetermined
            }
        }
        CmpOp::Lt => {
            if hi < 0.0 {
                Status::True
            } else if lo >= 0.0 {
                Status::False
            } else {
                Status::Undetermined
            }
        }
        CmpOp::Ge => {
            if lo >= 0.0 {
                Status::True
            } else if hi < 0.0 {
                Status::False
            } else {
                Status::Undetermined
            }
        }
        CmpOp::Gt => {
            if lo > 0.0 {
                Status::True
            } else if hi <= 0.0 {
                Status::False
            } else {
                Status::Undetermined
            }
        }
        CmpOp::Eq => {
            if lo == 0.0 && hi == 0.0 {
                Status::True
            } else if lo > 0.0 || hi < 0.0 {
                Status::False
            } else {
                Status::Undetermined
            }
        }
    }
}

fn atom_holds(atom: &Atom, assignment: &[f64]) -> bool {
    let value = atom.expr.eval(assignment);
    match atom.op {
        CmpOp::Le => value <= VERIFY_EPS,
        CmpOp::Lt => value < 0.0,
        CmpOp::Ge => value >= -VERIFY_EPS,
        CmpOp::Gt => value > 0.0,
        CmpOp::Eq => value.abs() <= VERIFY_EPS,
    }
}

/// Tighten the upper end of an interval; `true` when it actually moved.
fn apply_upper(iv: &mut Interval, limit: f64, strict: bool, domain: Domain) -> bool {
    let (limit, strict) = match domain {
        Domain::Int => (integer_upper(limit, strict), false),
        Domain::Real => (limit, strict),
    };
    if limit < iv.hi || (limit == iv.hi && strict && !iv.hi_strict) {
        iv.hi = limit;
        iv.hi_strict = strict;
        true
    } else {
        false
    }
}

/// Tighten the lower end of an interval; `true` when it actually moved.
fn apply_lower(iv: &mut Interval, limit: f64, strict: bool, domain: Domain) -> bool {
    let (limit, strict) = match domain {
        Domain::Int => (integer_lower(limit, strict), false),
        Domain::Real => (limit, strict),
    };
    if limit > iv.lo || (limit == iv.lo && strict && !iv.lo_strict) {
        iv.lo = limit;
        iv.lo_strict = strict;
        true
    } else {
        false
    }
}

/// Round an upper bound down to the admissible integer.
fn integer_upper(limit: f64, strict: bool) -> f64 {
    let floored = limit.floor();
    if strict && floored == limit {
        floored - 1.0
    } else {
        floored
    }
}

/// Round a lower bound up to the admissible integer.
fn integer_lower(limit: f64, strict: bool) -> f64 {
    let ceiled = limit.ceil();
    if strict && ceiled == limit {
        ceiled + 1.0
    } else {
        ceiled
    }
}

/// Pick a concrete value inside a non-empty interval.
fn pick_value(iv: &Interval, domain: Domain) -> f64 {
    match domain {
        Domain::Int => {
            // Integer bounds are already rounded and non-strict.
            if iv.lo.is_finite() {
                iv.lo
            } else if iv.hi.is_finite() {
                iv.hi
            } else {
                0.0
            }
        }
        Domain::Real => {
            if iv.lo.is_finite() && iv.hi.is_finite() {
                if iv.lo_strict || iv.hi_strict {
                    (iv.lo + iv.hi) / 2.0
                } else {
                    iv.lo
                }
            } else if iv.lo.is_finite() {
                if iv.lo_strict {
                    iv.lo + 1.0
                } else {
                    iv.lo
                }
            } else if iv.hi.is_finite() {
                if iv.hi_strict {
                    iv.hi - 1.0
                } else {
                    iv.hi
                }
            } else {
                0.0
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> Budget {
        Budget::new(100_000)
    }

    #[test]
    fn empty_solver_is_sat() {
        let solver = Solver::new();
        assert!(matches!(solver.check(&mut budget()), Verdict::Sat(_)));
    }

    #[test]
    fn pinned_variable_appears_in_model() {
        let mut solver = Solver::new();
        let x = solver.int_var("x");
        solver.assert(Formula::pin(x, 30.0));
        match solver.check(&mut budget()) {
            Verdict::Sat(model) => assert_eq!(model["x"], ModelValue::Int(30)),
            other => panic!("expected Sat, got {:?}", other),
        }
    }

    #[test]
    fn conflicting_pins_are_unsat() {
        let mut solver = Solver::new();
        let x = solver.int_var("x");
        solver.assert(Formula::pin(x, 1.0));
        solver.assert(Formula::pin(x, 2.0));
        assert_eq!(solver.check(&mut budget()), Verdict::Unsat);
    }

    #[test]
    fn strict_integer_bound_rounds_inward() {
        // x > 5 over ints means x >= 6.
        let mut solver = Solver::new();
        let x = solver.int_var("x");
        solver.assert(Formula::cmp(
            LinExpr::var(x).plus_const(-5.0),
            CmpOp::Gt,
        ));
        match solver.check(&mut budget()) {
            Verdict::Sat(model) => assert_eq!(model["x"], ModelValue::Int(6)),
            other => panic!("expected Sat, got {:?}", other),
        }
    }

    #[test]
    fn two_variable_inequality_chain() {
        // x == 3, y > x → y >= 4.
        let mut solver = Solver::new();
        let x = solver.int_var("x");
        let y = solver.int_var("y");
        solver.assert(Formula::pin(x, 3.0));
        solver.assert(Formula::cmp(
            LinExpr::var(y).plus_term(-1.0, x),
            CmpOp::Gt,
        ));
        match solver.check(&mut budget()) {
            Verdict::Sat(model) => assert_eq!(model["y"], ModelValue::Int(4)),
            other => panic!("expected Sat, got {:?}", other),
        }
    }

    #[test]
    fn ratio_style_real_constraints_conflict() {
        // a == 100, b == 10, a - 2b <= 0 cannot hold.
        let mut solver = Solver::new();
        let a = solver.real_var("a");
        let b = solver.real_var("b");
        solver.assert(Formula::pin(a, 100.0));
        solver.assert(Formula::pin(b, 10.0));
        solver.assert(Formula::cmp(
            LinExpr::var(a).plus_term(-2.0, b),
            CmpOp::Le,
        ));
        assert_eq!(solver.check(&mut budget()), Verdict::Unsat);
    }

    #[test]
    fn tautological_disjunction_does_not_branch_forever() {
        // (a - b <= 7) or (b - a <= 7) holds for any pinned pair.
        let mut solver = Solver::new();
        let a = solver.int_var("a");
        let b = solver.int_var("b");
        solver.assert(Formula::pin(a, 10.0));
        solver.assert(Formula::pin(b, 50.0));
        solver.assert(Formula::Or(vec![
            Formula::cmp(
                LinExpr::var(a).plus_term(-1.0, b).plus_const(-7.0),
                CmpOp::Le,
            ),
            Formula::cmp(
                LinExpr::var(b).plus_term(-1.0, a).plus_const(-7.0),
                CmpOp::Le,
            ),
        ]));
        assert!(matches!(solver.check(&mut budget()), Verdict::Sat(_)));
    }

    #[test]
    fn all_false_disjunction_is_unsat() {
        let mut solver = Solver::new();
        let x = solver.int_var("x");
        solver.assert(Formula::pin(x, 0.0));
        solver.assert(Formula::Or(vec![
            Formula::cmp(LinExpr::var(x).plus_const(-1.0), CmpOp::Eq),
            Formula::cmp(LinExpr::var(x).plus_const(-2.0), CmpOp::Eq),
        ]));
        assert_eq!(solver.check(&mut budget()), Verdict::Unsat);
    }

    #[test]
    fn undetermined_disjunction_branches_to_sat() {
        // No pins: x == 1 or x == 2 forces branching.
        let mut solver = Solver::new();
        let x = solver.int_var("x");
        solver.assert(Formula::Or(vec![
            Formula::cmp(LinExpr::var(x).plus_const(-1.0), CmpOp::Eq),
            Formula::cmp(LinExpr::var(x).plus_const(-2.0), CmpOp::Eq),
        ]));
        match solver.check(&mut budget()) {
            Verdict::Sat(model) => {
                assert!(matches!(model["x"], ModelValue::Int(1) | ModelValue::Int(2)));
            }
            other => panic!("expected Sat, got {:?}", other),
        }
    }

    #[test]
    fn exhausted_budget_reports_unknown() {
        let mut solver = Solver::new();
        let x = solver.int_var("x");
        solver.assert(Formula::pin(x, 1.0));
        let mut tiny = Budget::new(0);
        assert!(matches!(solver.check(&mut tiny), Verdict::Unknown(_)));
    }

    #[test]
    fn unconstrained_variable_defaults_to_zero() {
        let mut solver = Solver::new();
        solver.int_var("free");
        match solver.check(&mut budget()) {
            Verdict::Sat(model) => assert_eq!(model["free"], ModelValue::Int(0)),
            other => panic!("expected Sat, got {:?}", other),
        }
    }
}
