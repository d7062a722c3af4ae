//! `Runner`: sequences the two phases and the hand-off between them.

use std::collections::BTreeSet;

use tracing::info;

use ct_core::{LaneId, Phase, RunConfig};
use ct_engine::SimulationEngine;
use ct_network::{block_lanes_file, rewrite_config_file};

use crate::{PhaseReport, RunError, RunObserver, RunResult, run_phase};

/// Progress of a [`Runner`].  A failed run stays in the state it failed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Phase1Running,
    Phase1Analyzed,
    Phase2Running,
    Done,
}

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub phase1:        PhaseReport,
    /// Lanes at the maximum status after phase 1, blocked for phase 2.
    pub blocked_lanes: BTreeSet<LaneId>,
    /// References to the original network replaced in the configuration.
    pub config_references_replaced: usize,
    pub phase2:        PhaseReport,
}

/// Owns the configuration and engine for one two-phase run.
pub struct Runner<E: SimulationEngine> {
    config: RunConfig,
    engine: E,
    state:  RunState,
}

impl<E: SimulationEngine> Runner<E> {
    /// Validate `config` and return an idle runner.
    pub fn new(config: RunConfig, engine: E) -> RunResult<Self> {
        config.validate()?;
        Ok(Self { config, engine, state: RunState::Idle })
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Give back the engine (e.g. to inspect a test double after the run).
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Run both phases to completion.
    ///
    /// Phase 2 starts only after phase 1's engine session is closed and the
    /// mutated network and configuration are on disk.
    pub fn run<O: RunObserver>(&mut self, observer: &mut O) -> RunResult<RunReport> {
        if self.state != RunState::Idle {
            return Err(RunError::State(self.state));
        }

        // ── Phase 1 ───────────────────────────────────────────────────────
        self.state = RunState::Phase1Running;
        let (blocked_lanes, phase1) = self.run_and_export(Phase::One, observer)?;

        // ── Analyze and mutate ────────────────────────────────────────────
        self.state = RunState::Phase1Analyzed;
        info!(count = blocked_lanes.len(), "lanes selected for blocking");
        observer.on_lanes_blocked(&blocked_lanes);

        block_lanes_file(
            &self.config.network_path(),
            &self.config.updated_network_path(),
            &blocked_lanes,
        )?;
        let config_references_replaced = rewrite_config_file(
            &self.config.sumo_config_path(),
            &self.config.updated_config_path(),
            &self.config.network,
            &self.config.updated_network,
        )?;

        // ── Phase 2 ───────────────────────────────────────────────────────
        self.state = RunState::Phase2Running;
        let (_, phase2) = self.run_and_export(Phase::Two, observer)?;

        self.state = RunState::Done;
        Ok(RunReport {
            phase1,
            blocked_lanes,
            config_references_replaced,
            phase2,
        })
    }

    /// Run `phase`, export its dataset, and return its saturated lanes with
    /// the report.
    fn run_and_export<O: RunObserver>(
        &mut self,
        phase:    Phase,
        observer: &mut O,
    ) -> RunResult<(BTreeSet<LaneId>, PhaseReport)> {
        let settings = self.config.phase(phase);
        let outcome = run_phase(&mut self.engine, &settings, observer)
            .map_err(|source| RunError::Phase { phase, source })?;
        let report = outcome
            .export(&settings)
            .map_err(|source| RunError::Phase { phase, source })?;
        observer.on_phase_end(&report);
        Ok((outcome.lanes.saturated_lanes(), report))
    }
}
