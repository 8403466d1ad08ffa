//! Tests for [`contract_analysis::config`]
//!
//! Env-var tests use a process-wide `Mutex` to run serially even under the
//! default multi-threaded test harness (`cargo test`).

use contract_analysis::config::{
    load_config_from_env, DEFAULT_SOLVER_STEP_BUDGET, DEFAULT_SUBGRAPH_DEPTH,
};
use std::sync::{Mutex, MutexGuard};

// ── Serialiser ────────────────────────────────────────────────────────────────

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
}

// ── Helper: guard that restores env vars on drop ──────────────────────────────

struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        let original = std::env::var(key).ok();
        std::env::set_var(key, value);
        Self { key, original }
    }

    fn remove(key: &'static str) -> Self {
        let original = std::env::var(key).ok();
        std::env::remove_var(key);
        Self { key, original }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.original {
            Some(v) => std::env::set_var(self.key, v),
            None => std::env::remove_var(self.key),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_defaults_apply_when_env_is_unset() {
    let _lock = lock_env();
    let _g1 = EnvGuard::remove("GRAPH_URI");
    let _g2 = EnvGuard::remove("GRAPH_USER");
    let _g3 = EnvGuard::remove("SUBGRAPH_DEPTH");
    let _g4 = EnvGuard::remove("SOLVER_STEP_BUDGET");

    let config = load_config_from_env().expect("defaults should load");
    assert_eq!(config.graph.uri, "bolt://localhost:7687");
    assert_eq!(config.graph.user, "neo4j");
    assert_eq!(config.subgraph_depth, DEFAULT_SUBGRAPH_DEPTH);
    assert_eq!(config.solver_step_budget, DEFAULT_SOLVER_STEP_BUDGET);
}

#[test]
fn test_graph_uri_scheme_is_validated() {
    let _lock = lock_env();
    let _g = EnvGuard::set("GRAPH_URI", "http://localhost:7687");

    let err = load_config_from_env().expect_err("http scheme should be rejected");
    assert!(err.to_string().contains("GRAPH_URI"));
}

#[test]
fn test_neo4j_scheme_is_accepted() {
    let _lock = lock_env();
    let _g = EnvGuard::set("GRAPH_URI", "neo4j://graph.internal:7687");

    let config = load_config_from_env().expect("neo4j scheme should be accepted");
    assert_eq!(config.graph.uri, "neo4j://graph.internal:7687");
}

#[test]
fn test_non_numeric_depth_is_a_config_error() {
    let _lock = lock_env();
    let _g1 = EnvGuard::remove("GRAPH_URI");
    let _g2 = EnvGuard::set("SUBGRAPH_DEPTH", "two");

    let err = load_config_from_env().expect_err("non-numeric depth should fail");
    assert!(err.to_string().contains("SUBGRAPH_DEPTH"));
}

#[test]
fn test_zero_step_budget_is_rejected() {
    let _lock = lock_env();
    let _g1 = EnvGuard::remove("GRAPH_URI");
    let _g2 = EnvGuard::remove("SUBGRAPH_DEPTH");
    let _g3 = EnvGuard::set("SOLVER_STEP_BUDGET", "0");

    let err = load_config_from_env().expect_err("zero budget should fail");
    assert!(err.to_string().contains("SOLVER_STEP_BUDGET"));
}

#[test]
fn test_explicit_overrides_take_effect() {
    let _lock = lock_env();
    let _g1 = EnvGuard::remove("GRAPH_URI");
    let _g2 = EnvGuard::set("SUBGRAPH_DEPTH", "4");
    let _g3 = EnvGuard::set("SOLVER_STEP_BUDGET", "5000");

    let config = load_config_from_env().expect("overrides should load");
    assert_eq!(config.subgraph_depth, 4);
    assert_eq!(config.solver_step_budget, 5000);
}
