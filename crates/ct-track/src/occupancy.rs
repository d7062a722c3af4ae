//! `LaneOccupancy`: cumulative vehicle passes and congestion status per lane.
//!
//! # Bucketing
//!
//! Every observation of a vehicle on a lane during a step counts as one pass.
//! The status level is
//!
//!   status = min(MAX_STATUS, count / threshold_per_level)
//!
//! with integer division.  Counts only grow within a phase, so status never
//! decreases; once a lane reaches `MAX_STATUS` it stays there.

use std::collections::{BTreeMap, BTreeSet};

use ct_core::LaneId;

use crate::{TrackError, TrackResult};

/// Highest congestion level.  Lanes ending phase 1 here are blocked.
pub const MAX_STATUS: u8 = 4;

/// Status level for `count` cumulative passes.
#[inline]
pub fn status_for(count: u64, threshold_per_level: u64) -> u8 {
    (count / threshold_per_level).min(MAX_STATUS as u64) as u8
}

/// Snapshot of one lane.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LaneState {
    pub count:  u64,
    pub status: u8,
}

/// Per-lane counters for one phase.
///
/// Lanes are keyed in a `BTreeMap` so iteration (and the blocked-lane set
/// derived from it) is in stable lane-id order.
#[derive(Clone, Debug)]
pub struct LaneOccupancy {
    lanes:               BTreeMap<LaneId, LaneState>,
    threshold_per_level: u64,
}

impl LaneOccupancy {
    /// Create a tracker over `lanes`, all at count 0 / status 0.
    pub fn new<I>(lanes: I, threshold_per_level: u64) -> TrackResult<Self>
    where
        I: IntoIterator<Item = LaneId>,
    {
        if threshold_per_level == 0 {
            return Err(TrackError::ZeroThreshold);
        }
        let mut tracker = Self { lanes: BTreeMap::new(), threshold_per_level };
        tracker.initialize(lanes);
        Ok(tracker)
    }

    /// Forget every lane and start over with `lanes` at count 0 / status 0.
    pub fn initialize<I>(&mut self, lanes: I)
    where
        I: IntoIterator<Item = LaneId>,
    {
        self.lanes = lanes.into_iter().map(|id| (id, LaneState::default())).collect();
    }

    /// Count one vehicle observed on `lane` and return the updated state.
    ///
    /// # Errors
    ///
    /// [`TrackError::UnknownLane`] if `lane` was not part of the initialized
    /// set.  The tracker is left unchanged.
    pub fn record_pass(&mut self, lane: &LaneId) -> TrackResult<LaneState> {
        let threshold = self.threshold_per_level;
        let state = self
            .lanes
            .get_mut(lane)
            .ok_or_else(|| TrackError::UnknownLane(lane.clone()))?;
        state.count += 1;
        state.status = status_for(state.count, threshold);
        Ok(*state)
    }

    /// Current state of `lane`, if tracked.
    #[inline]
    pub fn get(&self, lane: &LaneId) -> Option<LaneState> {
        self.lanes.get(lane).copied()
    }

    /// Lanes whose status reached [`MAX_STATUS`], in id order.
    pub fn saturated_lanes(&self) -> BTreeSet<LaneId> {
        self.lanes
            .iter()
            .filter(|(_, s)| s.status == MAX_STATUS)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LaneId, &LaneState)> {
        self.lanes.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    #[inline]
    pub fn threshold_per_level(&self) -> u64 {
        self.threshold_per_level
    }
}
