//! Run observer trait for progress reporting.

use std::collections::BTreeSet;

use ct_core::{LaneId, Phase, PhaseSettings};

use crate::PhaseReport;

/// Callbacks invoked by [`Runner::run`][crate::Runner::run] and
/// [`run_phase`][crate::run_phase].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress { every: u64, steps: u64 }
///
/// impl RunObserver for Progress {
///     fn on_step_end(&mut self, phase: Phase, time: f64, active: usize, _exited: usize) {
///         self.steps += 1;
///         if self.steps % self.every == 0 {
///             println!("phase {phase} t={time}: {active} vehicles");
///         }
///     }
/// }
/// ```
pub trait RunObserver {
    /// Called once the engine is up and lanes are enumerated.
    fn on_phase_start(&mut self, _settings: &PhaseSettings, _lanes: usize) {}

    /// Called after every step, once exits have been reconciled.
    fn on_step_end(&mut self, _phase: Phase, _time: f64, _active: usize, _exited: usize) {}

    /// Called after the phase's dataset has been exported.
    fn on_phase_end(&mut self, _report: &PhaseReport) {}

    /// Called with the lanes selected for blocking, before the network is
    /// mutated.
    fn on_lanes_blocked(&mut self, _lanes: &BTreeSet<LaneId>) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
