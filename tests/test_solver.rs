//! Tests for [`contract_analysis::solver`]
//!
//! Scenario-level coverage through the public API; the finer propagation
//! mechanics are covered by the module's unit tests.

use contract_analysis::solver::{
    Budget, CmpOp, Formula, LinExpr, ModelValue, Solver, Verdict,
};

fn budget() -> Budget {
    Budget::new(100_000)
}

#[test]
fn test_variable_names_keep_declaration_order() {
    let mut solver = Solver::new();
    solver.int_var("deadline_c1");
    solver.real_var("amount_a");
    solver.int_var("start_p1");
    solver.int_var("deadline_c1"); // redeclaration is a lookup

    assert_eq!(
        solver.variable_names(),
        vec!["deadline_c1", "amount_a", "start_p1"]
    );
}

#[test]
fn test_var_ids_are_stable_across_instances() {
    let mut first = Solver::new();
    let a1 = first.int_var("a");
    let b1 = first.int_var("b");

    let mut second = Solver::new();
    let a2 = second.int_var("a");
    let b2 = second.int_var("b");

    assert_eq!(a1, a2);
    assert_eq!(b1, b2);
}

#[test]
fn test_contract_scale_mixed_problem_is_sat() {
    // Two pinned deadlines within tolerance, two compatible amounts, one
    // ordered interval: the kind of problem a consistent contract produces.
    let mut solver = Solver::new();
    let d1 = solver.int_var("deadline_c1");
    let d2 = solver.int_var("deadline_c2");
    let a1 = solver.real_var("amount_a1");
    let a2 = solver.real_var("amount_a2");
    let start = solver.int_var("start_p1");
    let end = solver.int_var("end_p1");

    solver.assert_named("pin_deadline_c1", Formula::pin(d1, 30.0));
    solver.assert_named("pin_deadline_c2", Formula::pin(d2, 33.0));
    solver.assert_named(
        "c_0_deadline_consistency",
        Formula::Or(vec![
            Formula::cmp(LinExpr::var(d1).plus_term(-1.0, d2).plus_const(-7.0), CmpOp::Le),
            Formula::cmp(LinExpr::var(d2).plus_term(-1.0, d1).plus_const(-7.0), CmpOp::Le),
        ]),
    );
    solver.assert_named("pin_amount_a1", Formula::pin(a1, 100.0));
    solver.assert_named("pin_amount_a2", Formula::pin(a2, 150.0));
    solver.assert_named(
        "c_1_amount_consistency",
        Formula::And(vec![
            Formula::cmp(LinExpr::var(a1).plus_term(-0.5, a2), CmpOp::Ge),
            Formula::cmp(LinExpr::var(a1).plus_term(-2.0, a2), CmpOp::Le),
        ]),
    );
    solver.assert_named("pin_start_p1", Formula::pin(start, 10.0));
    solver.assert_named(
        "c_2_temporal_order",
        Formula::cmp(LinExpr::var(end).plus_term(-1.0, start), CmpOp::Ge),
    );

    match solver.check(&mut budget()) {
        Verdict::Sat(model) => {
            assert_eq!(model["deadline_c1"], ModelValue::Int(30));
            assert_eq!(model["amount_a2"], ModelValue::Real(150.0));
            // Unpinned end must satisfy end >= start.
            match model["end_p1"] {
                ModelValue::Int(v) => assert!(v >= 10),
                other => panic!("expected integer end, got {:?}", other),
            }
        }
        other => panic!("expected Sat, got {:?}", other),
    }
}

#[test]
fn test_incompatible_amount_ratio_is_unsat() {
    let mut solver = Solver::new();
    let a = solver.real_var("amount_a");
    let b = solver.real_var("amount_b");
    solver.assert_named("pin_amount_a", Formula::pin(a, 100.0));
    solver.assert_named("pin_amount_b", Formula::pin(b, 10.0));
    solver.assert_named(
        "c_0_amount_consistency",
        Formula::And(vec![
            Formula::cmp(LinExpr::var(a).plus_term(-0.5, b), CmpOp::Ge),
            Formula::cmp(LinExpr::var(a).plus_term(-2.0, b), CmpOp::Le),
        ]),
    );
    assert_eq!(solver.check(&mut budget()), Verdict::Unsat);
}

#[test]
fn test_reversed_interval_is_unsat() {
    let mut solver = Solver::new();
    let start = solver.int_var("start_p1");
    let end = solver.int_var("end_p1");
    solver.assert(Formula::pin(start, 5.0));
    solver.assert(Formula::pin(end, 3.0));
    solver.assert(Formula::cmp(
        LinExpr::var(end).plus_term(-1.0, start),
        CmpOp::Ge,
    ));
    assert_eq!(solver.check(&mut budget()), Verdict::Unsat);
}

#[test]
fn test_unsat_beats_budget_on_early_conflict() {
    // The conflict surfaces within a few propagation steps even with a
    // modest budget.
    let mut solver = Solver::new();
    let x = solver.int_var("x");
    solver.assert(Formula::pin(x, 1.0));
    solver.assert(Formula::pin(x, 9.0));
    let mut small = Budget::new(50);
    assert_eq!(solver.check(&mut small), Verdict::Unsat);
}

#[test]
fn test_verdicts_never_coerce_unknown() {
    // With a zero budget the solver must say Unknown, not guess.
    let mut solver = Solver::new();
    let x = solver.int_var("x");
    solver.assert(Formula::pin(x, 1.0));
    let mut empty = Budget::new(0);
    match solver.check(&mut empty) {
        Verdict::Unknown(reason) => assert!(reason.contains("budget")),
        other => panic!("expected Unknown, got {:?}", other),
    }
}
