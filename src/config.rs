//! Configuration loading from environment variables via dotenvy.
//! No values are ever hardcoded outside this module.

use crate::error::AnalysisError;

/// Connection settings for the external graph store backend.
///
/// The engine itself never opens a connection; these settings are injected
/// into whatever [`crate::graph_source::GraphSource`] implementation the
/// embedding application constructs. Core logic never reads the process
/// environment directly.
#[derive(Debug, Clone)]
pub struct GraphSettings {
    /// Bolt endpoint of the graph store — sourced from `GRAPH_URI`
    pub uri: String,
    /// Username — sourced from `GRAPH_USER`
    pub user: String,
    /// Password — sourced from `GRAPH_PASSWORD`
    pub password: String,
}

/// Runtime configuration for the analysis engine, constructed once at
/// process start and passed by reference into each component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Graph store connection settings.
    pub graph: GraphSettings,
    /// Traversal depth used when fetching a contract's subgraph —
    /// sourced from `SUBGRAPH_DEPTH`.
    pub subgraph_depth: u32,
    /// Work budget for a single solver invocation, in propagation steps —
    /// sourced from `SOLVER_STEP_BUDGET`. The solver resolves to `Unknown`
    /// when the budget runs out rather than hanging.
    pub solver_step_budget: u64,
}

/// Load configuration purely from already-set environment variables.
///
/// Does **not** call `dotenvy::dotenv()` — useful in tests that need to
/// control the env precisely via [`std::env::set_var`] / [`std::env::remove_var`].
///
/// # Errors
/// Returns [`AnalysisError::Config`] if a variable is present but invalid.
pub fn load_config_from_env() -> Result<Config, AnalysisError> {
    let uri = std::env::var("GRAPH_URI").unwrap_or_else(|_| "bolt://localhost:7687".to_string());

    if !uri.starts_with("bolt://") && !uri.starts_with("neo4j://") {
        return Err(AnalysisError::Config(
            "GRAPH_URI must start with bolt:// or neo4j://".to_string(),
        ));
    }

    let user = std::env::var("GRAPH_USER").unwrap_or_else(|_| "neo4j".to_string());
    let password = std::env::var("GRAPH_PASSWORD").unwrap_or_default();

    let subgraph_depth = match std::env::var("SUBGRAPH_DEPTH") {
        Ok(v) => v.parse::<u32>().map_err(|_| {
            AnalysisError::Config(format!("SUBGRAPH_DEPTH is not a valid integer: '{v}'"))
        })?,
        Err(_) => DEFAULT_SUBGRAPH_DEPTH,
    };

    let solver_step_budget = match std::env::var("SOLVER_STEP_BUDGET") {
        Ok(v) => v.parse::<u64>().map_err(|_| {
            AnalysisError::Config(format!("SOLVER_STEP_BUDGET is not a valid integer: '{v}'"))
        })?,
        Err(_) => DEFAULT_SOLVER_STEP_BUDGET,
    };

    if solver_step_budget == 0 {
        return Err(AnalysisError::Config(
            "SOLVER_STEP_BUDGET must be greater than zero".to_string(),
        ));
    }

    Ok(Config {
        graph: GraphSettings {
            uri,
            user,
            password,
        },
        subgraph_depth,
        solver_step_budget,
    })
}

/// Load configuration from the environment (`.env` + system env vars).
///
/// Loads `.env` via `dotenvy` first (ignoring errors if the file is absent),
/// then delegates to [`load_config_from_env`].
///
/// # Errors
/// Returns [`AnalysisError::Config`] if a variable is present but invalid.
pub fn load_config() -> Result<Config, AnalysisError> {
    // Load .env if present; ignore the error — variables may already be set externally.
    let _ = dotenvy::dotenv();
    load_config_from_env()
}

// ── Analysis thresholds ────────────────────────────────────────────────────

/// Default graph traversal depth for subgraph fetches.
pub const DEFAULT_SUBGRAPH_DEPTH: u32 = 2;

/// Default solver work budget (propagation steps + branch expansions).
pub const DEFAULT_SOLVER_STEP_BUDGET: u64 = 100_000;

/// Amounts whose max/min ratio exceeds this trigger AMOUNT_INCONSISTENCY.
pub const AMOUNT_RATIO_LIMIT: f64 = 2.0;

/// Lower ratio bound used in the pairwise amount-consistency constraint.
pub const AMOUNT_RATIO_FLOOR: f64 = 0.5;

/// Pairwise deadline difference (days) tolerated by the "reasonable
/// consistency" constraint. See `constraints.rs` — the encoded disjunction
/// is deliberately loose.
pub const DEADLINE_TOLERANCE_DAYS: i64 = 7;

/// Clause types every contract is expected to carry.
pub const REQUIRED_CLAUSE_TYPES: &[&str] = &["PaymentDeadline", "DeliveryDate", "TerminationClause"];

/// Relationship type linking a contract node to its clause nodes.
pub const HAS_CLAUSE: &str = "HAS_CLAUSE";
