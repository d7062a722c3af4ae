//! `TelemetryRecorder`: append-only per-phase dataset.

use ct_core::GeoPoint;
use ct_engine::VehicleObservation;
use ct_track::LaneState;

use crate::row::{TelemetryRecord, TelemetryRow, wall_clock_timestamp};

/// Convert m/s to km/h, rounded to two decimals (half away from zero).
#[inline]
pub fn speed_kmh(speed_mps: f64) -> f64 {
    (speed_mps * 3.6 * 100.0).round() / 100.0
}

/// Accumulates one record per active vehicle per step.
///
/// A vehicle active for `k` steps contributes `k` records.
#[derive(Debug, Default)]
pub struct TelemetryRecorder {
    records: Vec<TelemetryRecord>,
    steps:   u64,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the record for one vehicle, stamped with the wall clock.
    ///
    /// `lane` must already include this observation's pass, so status and
    /// count describe the current step.
    pub fn record(
        &mut self,
        sim_time:    f64,
        observation: &VehicleObservation,
        geo:         GeoPoint,
        lane:        LaneState,
    ) {
        self.record_at(wall_clock_timestamp(), sim_time, observation, geo, lane);
    }

    /// [`record`](Self::record) with an explicit `timestamp` column value.
    pub fn record_at(
        &mut self,
        timestamp:   String,
        sim_time:    f64,
        observation: &VehicleObservation,
        geo:         GeoPoint,
        lane:        LaneState,
    ) {
        self.records.push(TelemetryRecord {
            timestamp,
            sim_time,
            vehicle:     observation.vehicle.clone(),
            position:    observation.position,
            geo,
            speed_kmh:   speed_kmh(observation.speed_mps),
            road:        observation.road.clone(),
            lane:        observation.lane.clone(),
            lane_status: lane.status,
            lane_count:  lane.count,
        });
    }

    /// Mark the end of a step.  Only used for bookkeeping.
    pub fn end_step(&mut self) {
        self.steps += 1;
    }

    #[inline]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    /// Attach `average_dwell` to every record and hand back the table.
    pub fn finalize(self, average_dwell: f64) -> TelemetryTable {
        let rows = self
            .records
            .into_iter()
            .map(|record| TelemetryRow { record, avg_dwell_secs: average_dwell })
            .collect();
        TelemetryTable { rows, average_dwell }
    }
}

/// A finalized phase dataset, ready for export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryTable {
    rows:          Vec<TelemetryRow>,
    average_dwell: f64,
}

impl TelemetryTable {
    pub fn rows(&self) -> &[TelemetryRow] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn average_dwell(&self) -> f64 {
        self.average_dwell
    }
}
