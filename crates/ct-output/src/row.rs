//! Typed telemetry rows.

use chrono::{DateTime, Utc};
use chrono_tz::US::Eastern;

use ct_core::{GeoPoint, LaneId, SimPosition, VehicleId};

/// Layout of the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `at` rendered in US/Eastern local time with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Eastern).format(TIMESTAMP_FORMAT).to_string()
}

/// The current wall-clock time as a `timestamp` column value.
pub fn wall_clock_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Exported column names, in order.
pub const COLUMNS: [&str; 10] = [
    "timestamp",
    "vehicle_id",
    "position",
    "geo_position",
    "speed_kmh",
    "road_id",
    "lane_id",
    "lane_status",
    "lane_count",
    "avg_dwell_time",
];

/// One active vehicle observed during one step.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    /// Wall-clock capture time, see [`format_timestamp`].
    pub timestamp:   String,
    /// Simulation time of the step, in seconds.  Not exported.
    pub sim_time:    f64,
    pub vehicle:     VehicleId,
    pub position:    SimPosition,
    pub geo:         GeoPoint,
    /// km/h, rounded to two decimals.
    pub speed_kmh:   f64,
    pub road:        String,
    pub lane:        LaneId,
    /// Lane status right after this observation was counted.
    pub lane_status: u8,
    /// Lane cumulative count right after this observation was counted.
    pub lane_count:  u64,
}

/// A record with the phase-wide average dwell time attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRow {
    pub record:         TelemetryRecord,
    pub avg_dwell_secs: f64,
}

impl TelemetryRow {
    /// Field values in [`COLUMNS`] order.
    pub fn fields(&self) -> [String; 10] {
        let r = &self.record;
        [
            r.timestamp.clone(),
            r.vehicle.to_string(),
            r.position.to_string(),
            r.geo.to_string(),
            r.speed_kmh.to_string(),
            r.road.clone(),
            r.lane.to_string(),
            r.lane_status.to_string(),
            r.lane_count.to_string(),
            self.avg_dwell_secs.to_string(),
        ]
    }
}
