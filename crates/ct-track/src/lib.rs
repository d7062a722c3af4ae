//! `ct-track`: the two per-phase state holders of the pipeline.
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`occupancy`] | `LaneOccupancy`: cumulative passes and 0–4 status per lane  |
//! | [`dwell`]     | `DwellTracker`: entry times, exits, average dwell           |
//! | [`error`]     | `TrackError`, `TrackResult<T>`                               |
//!
//! Both trackers are owned by a single phase and re-created (or explicitly
//! re-initialized) at the start of the next one.  Nothing is shared between
//! phases except the final lane snapshot used to pick blocked lanes.

pub mod dwell;
pub mod error;
pub mod occupancy;

#[cfg(test)]
mod tests;

pub use dwell::{DwellSummary, DwellTracker, Exit};
pub use error::{TrackError, TrackResult};
pub use occupancy::{LaneOccupancy, LaneState, MAX_STATUS, status_for};
