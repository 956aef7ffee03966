//! Runs one simulation from a JSON request file and prints the outcome.
//!
//! Usage: `cohortsim-simulate <request.json> [--summary-only]`
//!
//! Logs go to stderr; set `RUST_LOG` to adjust verbosity.

use std::env;
use std::fs;
use std::process;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use cohortsim::{
    ExperimentDesign, SimResult, SimulationConfig, SimulationOrchestrator, Stimulus,
    ValidationError,
};

#[derive(Debug, Deserialize)]
struct SimulationRequest {
    design: ExperimentDesign,
    stimuli: Vec<Stimulus>,
    /// Falls back to the design's sample size plan.
    #[serde(default)]
    n_participants: Option<i64>,
    #[serde(default)]
    seed: u64,
    #[serde(default)]
    config: SimulationConfig,
}

fn run(request: SimulationRequest, summary_only: bool) -> SimResult<String> {
    let orchestrator = SimulationOrchestrator::new(request.config)?;
    let outcome = match request.n_participants {
        Some(n) => {
            let n = usize::try_from(n)
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ValidationError::InvalidParticipantCount { count: n })?;
            orchestrator.run(&request.design, &request.stimuli, n, request.seed)?
        }
        None => orchestrator.run_planned(&request.design, &request.stimuli, request.seed)?,
    };

    for note in outcome.summary.notes() {
        eprintln!("note: {note}");
    }
    if summary_only {
        outcome.summary.to_json()
    } else {
        Ok(serde_json::to_string_pretty(&outcome)?)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("usage: cohortsim-simulate <request.json> [--summary-only]");
        process::exit(2);
    };
    let summary_only = args.iter().skip(2).any(|a| a == "--summary-only");

    let raw = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("cohortsim-simulate: cannot read {path}: {e}");
        process::exit(2);
    });
    let request: SimulationRequest = serde_json::from_str(&raw).unwrap_or_else(|e| {
        eprintln!("cohortsim-simulate: invalid request: {e}");
        process::exit(2);
    });

    match run(request, summary_only) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("cohortsim-simulate: {e}");
            process::exit(1);
        }
    }
}
