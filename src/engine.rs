//! Analysis engine facade — one construction point for all three analyses.
//!
//! The engine owns nothing but configuration and a borrowed graph source;
//! every call is independent and side-effect free. Embedding applications
//! construct one engine per source and invoke operations as needed.

use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::constraints::ConstraintChecker;
use crate::contradictions::ContradictionFinder;
use crate::error::AnalysisError;
use crate::graph_source::GraphSource;
use crate::rules::run_rules;
use crate::types::{CheckReport, ConstraintFactSet, ContradictionReport, RulesReport};

/// Facade over the contradiction finder, rule engine and constraint checker.
pub struct AnalysisEngine<'a, S: GraphSource> {
    config: &'a Config,
    source: &'a S,
}

impl<'a, S: GraphSource> AnalysisEngine<'a, S> {
    pub fn new(config: &'a Config, source: &'a S) -> Self {
        Self { config, source }
    }

    /// Scan a contract's subgraph for pairwise contradictions.
    pub fn find_contradictions(
        &self,
        contract_id: &str,
    ) -> Result<ContradictionReport, AnalysisError> {
        let finder = ContradictionFinder::new(self.config, self.source);
        let report = finder.find(contract_id)?;
        info!(
            "contract '{}': {} contradiction(s)",
            contract_id, report.count
        );
        Ok(report)
    }

    /// Run the structural rule battery over a raw subgraph document.
    pub fn run_rules(&self, subgraph: &Value) -> Result<RulesReport, AnalysisError> {
        let report = run_rules(subgraph)?;
        info!(
            "rules: {} flag(s) over {} node(s)",
            report.summary.total_flags, report.summary.nodes_analyzed
        );
        Ok(report)
    }

    /// Check a fact set for joint satisfiability.
    pub fn check_constraints(
        &self,
        facts: &ConstraintFactSet,
    ) -> Result<CheckReport, AnalysisError> {
        let checker = ConstraintChecker::new(self.config);
        let report = checker.check(facts)?;
        info!(
            "constraints: {:?} over {} variable(s)",
            report.result,
            report.variables.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GraphSettings, DEFAULT_SOLVER_STEP_BUDGET, DEFAULT_SUBGRAPH_DEPTH};
    use crate::graph_source::InMemoryGraphSource;
    use serde_json::json;

    fn test_config() -> Config {
        Config {
            graph: GraphSettings {
                uri: "bolt://localhost:7687".to_string(),
                user: "neo4j".to_string(),
                password: String::new(),
            },
            subgraph_depth: DEFAULT_SUBGRAPH_DEPTH,
            solver_step_budget: DEFAULT_SOLVER_STEP_BUDGET,
        }
    }

    #[test]
    fn unknown_contract_yields_empty_report() {
        let config = test_config();
        let source = InMemoryGraphSource::new();
        let engine = AnalysisEngine::new(&config, &source);

        let report = engine.find_contradictions("ct-missing").unwrap();
        assert_eq!(report.count, 0);
        assert!(report.contradictions.is_empty());
    }

    #[test]
    fn all_three_operations_run_against_one_engine() {
        let config = test_config();
        let mut source = InMemoryGraphSource::new();
        source.insert(
            "ct-1",
            json!({
                "id": "ct-1",
                "_type": "Contract",
                "has_clause": [
                    {"id": "cl-1", "_type": "PaymentDeadline", "deadline_days": 30},
                    {"id": "cl-2", "_type": "PaymentDeadline", "deadline_days": 45},
                ],
            }),
        );
        let engine = AnalysisEngine::new(&config, &source);

        let contradictions = engine.find_contradictions("ct-1").unwrap();
        assert_eq!(contradictions.count, 1);

        let rules = engine
            .run_rules(&json!({
                "nodes": [
                    {"id": "cl-1", "type": "PaymentDeadline",
                     "properties": {"deadline_days": 30}},
                    {"id": "cl-2", "type": "PaymentDeadline",
                     "properties": {"deadline_days": 45}},
                ],
                "relationships": [],
            }))
            .unwrap();
        assert_eq!(rules.summary.total_flags, 1);

        let mut facts = ConstraintFactSet::default();
        facts.deadlines.insert("d1".to_string(), 10);
        let check = engine.check_constraints(&facts).unwrap();
        assert!(check.sat);
    }
}
