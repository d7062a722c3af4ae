//! One phase: a complete simulation run under a fixed threshold.

use std::path::PathBuf;

use tracing::{debug, info, trace, warn};

use ct_core::{Phase, PhaseSettings};
use ct_engine::SimulationEngine;
use ct_output::{TelemetryRecorder, TelemetryTable, export_csv, speed_kmh};
use ct_track::{DwellSummary, DwellTracker, LaneOccupancy};

use crate::{PhaseError, RunObserver};

/// Everything a finished phase produced, before export.
#[derive(Debug)]
pub struct PhaseOutcome {
    pub phase: Phase,
    pub steps: u64,
    /// Final lane snapshot.  Phase 1's drives lane blocking.
    pub lanes: LaneOccupancy,
    pub dwell: DwellSummary,
    pub table: TelemetryTable,
}

impl PhaseOutcome {
    /// Write the dataset to `settings.output_csv` and summarize.
    pub fn export(&self, settings: &PhaseSettings) -> Result<PhaseReport, PhaseError> {
        export_csv(&settings.output_csv, &self.table)?;
        Ok(PhaseReport {
            phase:              self.phase,
            steps:              self.steps,
            records:            self.table.len(),
            lanes:              self.lanes.len(),
            saturated_lanes:    self.lanes.saturated_lanes().len(),
            exited:             self.dwell.exited,
            in_flight:          self.dwell.in_flight,
            average_dwell_secs: self.dwell.average_secs,
            output_csv:         settings.output_csv.clone(),
        })
    }
}

/// Summary of an exported phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseReport {
    pub phase:              Phase,
    pub steps:              u64,
    pub records:            usize,
    pub lanes:              usize,
    pub saturated_lanes:    usize,
    pub exited:             u64,
    pub in_flight:          usize,
    pub average_dwell_secs: f64,
    pub output_csv:         PathBuf,
}

/// Run one phase to completion.
///
/// The engine is started from `settings.config` and closed again whether the
/// phase succeeds or not.  On failure the in-memory dataset is discarded.
pub fn run_phase<E, O>(
    engine:   &mut E,
    settings: &PhaseSettings,
    observer: &mut O,
) -> Result<PhaseOutcome, PhaseError>
where
    E: SimulationEngine,
    O: RunObserver,
{
    info!(
        phase = %settings.phase,
        config = %settings.config.display(),
        threshold = settings.threshold_per_level,
        "phase starting"
    );
    engine.start(&settings.config)?;

    match drive(engine, settings, observer) {
        Ok(outcome) => {
            engine.close()?;
            info!(
                phase = %outcome.phase,
                steps = outcome.steps,
                records = outcome.table.len(),
                exited = outcome.dwell.exited,
                avg_dwell_secs = outcome.dwell.average_secs,
                "phase complete"
            );
            Ok(outcome)
        }
        Err(e) => {
            if let Err(close_err) = engine.close() {
                warn!(phase = %settings.phase, error = %close_err, "failed to close engine after abort");
            }
            Err(e)
        }
    }
}

fn drive<E, O>(
    engine:   &mut E,
    settings: &PhaseSettings,
    observer: &mut O,
) -> Result<PhaseOutcome, PhaseError>
where
    E: SimulationEngine,
    O: RunObserver,
{
    let phase = settings.phase;
    let mut lanes = LaneOccupancy::new(engine.lane_ids()?, settings.threshold_per_level)?;
    let mut dwell = DwellTracker::new();
    let mut recorder = TelemetryRecorder::new();
    observer.on_phase_start(settings, lanes.len());

    while engine.min_expected_remaining()? > 0 {
        engine.simulation_step()?;
        let now = engine.current_time()?;
        let active = engine.vehicle_ids()?;

        for vehicle in &active {
            dwell.observe_active(vehicle, now);
        }

        // Count the pass before capturing so the record reflects this step.
        for vehicle in &active {
            let observation = engine.observe_vehicle(vehicle)?;
            let lane = lanes.record_pass(&observation.lane)?;
            let geo = engine.project_to_geo(observation.position)?;
            trace!(
                %phase,
                time = now,
                vehicle = %observation.vehicle,
                position = %observation.position,
                geo = %geo,
                speed_kmh = speed_kmh(observation.speed_mps),
                road = %observation.road,
                lane = %observation.lane,
                status = lane.status,
                count = lane.count,
                "vehicle"
            );
            recorder.record(now, &observation, geo, lane);
        }
        recorder.end_step();

        let exits = dwell.reconcile(&active, now);
        debug!(%phase, time = now, active = active.len(), exited = exits.len(), "step");
        observer.on_step_end(phase, now, active.len(), exits.len());
    }

    let summary = dwell.summary();
    if summary.in_flight > 0 {
        warn!(%phase, in_flight = summary.in_flight, "vehicles still in network at phase end are excluded from dwell average");
    }

    Ok(PhaseOutcome {
        phase,
        steps: recorder.steps(),
        table: recorder.finalize(summary.average_secs),
        lanes,
        dwell: summary,
    })
}
