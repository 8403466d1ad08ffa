//! Contract analysis entry point.
//!
//! Thin CLI over the analysis engine. Each subcommand reads JSON input,
//! runs one analysis and prints the report as pretty JSON on stdout.
//!
//! ```text
//! contract-analysis rules <subgraph.json>
//! contract-analysis check <facts.json>
//! contract-analysis contradictions <graph.json> <contract-id>
//! ```

use std::fs;
use std::process::ExitCode;

use serde_json::Value;

use contract_analysis::config::load_config;
use contract_analysis::engine::AnalysisEngine;
use contract_analysis::error::AnalysisError;
use contract_analysis::graph_source::InMemoryGraphSource;
use contract_analysis::types::ConstraintFactSet;

fn main() -> ExitCode {
    // Structured logging — default level WARN to keep report output clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AnalysisError> {
    let config = load_config()?;

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("rules") => {
            let path = arg(&args, 2, "rules <subgraph.json>")?;
            let subgraph: Value = read_json(path)?;
            let source = InMemoryGraphSource::new();
            let engine = AnalysisEngine::new(&config, &source);
            print_report(&engine.run_rules(&subgraph)?)
        }
        Some("check") => {
            let path = arg(&args, 2, "check <facts.json>")?;
            let facts: ConstraintFactSet = serde_json::from_str(&fs::read_to_string(path)?)?;
            let source = InMemoryGraphSource::new();
            let engine = AnalysisEngine::new(&config, &source);
            print_report(&engine.check_constraints(&facts)?)
        }
        Some("contradictions") => {
            let path = arg(&args, 2, "contradictions <graph.json> <contract-id>")?;
            let contract_id = arg(&args, 3, "contradictions <graph.json> <contract-id>")?;
            let document: Value = read_json(path)?;
            let mut source = InMemoryGraphSource::new();
            source.insert(contract_id, document);
            let engine = AnalysisEngine::new(&config, &source);
            print_report(&engine.find_contradictions(contract_id)?)
        }
        _ => Err(AnalysisError::InputValidation(
            "usage: contract-analysis <rules|check|contradictions> ...".to_string(),
        )),
    }
}

fn arg<'a>(args: &'a [String], index: usize, usage: &str) -> Result<&'a str, AnalysisError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| AnalysisError::InputValidation(format!("usage: contract-analysis {usage}")))
}

fn read_json(path: &str) -> Result<Value, AnalysisError> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn print_report<T: serde::Serialize>(report: &T) -> Result<(), AnalysisError> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
