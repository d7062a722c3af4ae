//! two-phase: congestion-adaptive re-simulation of a SUMO scenario.
//!
//! Runs the scenario once, blocks every lane that saturated, and runs it
//! again on the mutated network.  Usage:
//!
//! ```text
//! two-phase [run.json]
//! ```
//!
//! Without an argument the stock layout in the current directory is used
//! (`osm.sumocfg`, `osm.net.xml.gz`).  Set `RUST_LOG=debug` for per-step
//! logging.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ct_core::{LaneId, Phase, PhaseSettings, RunConfig};
use ct_engine::TraciEngine;
use ct_run::{PhaseReport, RunObserver, Runner};

// ── Progress observer ────────────────────────────────────────────────────────

/// Logs a progress line every `interval` simulated steps.
struct Progress {
    interval: u64,
    steps:    u64,
}

impl RunObserver for Progress {
    fn on_phase_start(&mut self, settings: &PhaseSettings, lanes: usize) {
        self.steps = 0;
        info!(phase = %settings.phase, lanes, "tracking lanes");
    }

    fn on_step_end(&mut self, phase: Phase, time: f64, active: usize, _exited: usize) {
        self.steps += 1;
        if self.steps.is_multiple_of(self.interval) {
            info!(%phase, time, active, "progress");
        }
    }

    fn on_phase_end(&mut self, report: &PhaseReport) {
        info!(
            phase = %report.phase,
            records = report.records,
            saturated = report.saturated_lanes,
            output = %report.output_csv.display(),
            "phase exported"
        );
    }

    fn on_lanes_blocked(&mut self, lanes: &BTreeSet<LaneId>) {
        for lane in lanes {
            info!(%lane, "blocking lane");
        }
    }
}

// ── main ─────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => RunConfig::from_json_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RunConfig::default(),
    };

    let engine = TraciEngine::new(&config.sumo_binary).args(["--no-step-log", "true"]);
    let mut runner = Runner::new(config, engine)?;
    let mut progress = Progress { interval: 500, steps: 0 };

    let t0 = Instant::now();
    let report = runner
        .run(&mut progress)
        .with_context(|| format!("run stopped in state {:?}", runner.state()))?;
    let elapsed = t0.elapsed();

    println!("Run complete in {:.1} s", elapsed.as_secs_f64());
    println!("Blocked lanes: {}", report.blocked_lanes.len());
    println!();
    println!("{:<6} {:>8} {:>10} {:>8} {:>14}", "Phase", "Steps", "Records", "Exited", "Avg dwell (s)");
    println!("{}", "-".repeat(50));
    for p in [&report.phase1, &report.phase2] {
        println!(
            "{:<6} {:>8} {:>10} {:>8} {:>14.2}",
            p.phase.to_string(),
            p.steps,
            p.records,
            p.exited,
            p.average_dwell_secs
        );
    }
    Ok(())
}
