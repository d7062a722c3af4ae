//! `ct-output`: telemetry datasets for one phase.
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`row`]      | `TelemetryRecord` (per step), `TelemetryRow`, timestamps   |
//! | [`recorder`] | `TelemetryRecorder`, `TelemetryTable`                      |
//! | [`writer`]   | `OutputWriter` trait                                       |
//! | [`csv`]      | `CsvWriter` backend                                        |
//!
//! Records accumulate in memory for the whole phase; nothing touches disk
//! until [`TelemetryRecorder::finalize`] has stamped the phase's average
//! dwell time onto every row and the table is exported.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut recorder = TelemetryRecorder::new();
//! recorder.record(now, &observation, geo, lane_state);
//! let table = recorder.finalize(dwell.average_dwell());
//! export_csv(Path::new("output1.csv"), &table)?;
//! ```

pub mod csv;
pub mod error;
pub mod recorder;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::{CsvWriter, export_csv};
pub use error::{OutputError, OutputResult};
pub use recorder::{TelemetryRecorder, TelemetryTable, speed_kmh};
pub use row::{
    COLUMNS, TIMESTAMP_FORMAT, TelemetryRecord, TelemetryRow, format_timestamp, wall_clock_timestamp,
};
pub use writer::OutputWriter;
