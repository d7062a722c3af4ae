//! `DwellTracker`: how long vehicles stay in the network.
//!
//! A vehicle's entry time is the simulation time of the first step it is seen
//! active.  On the first step it is no longer reported, its dwell time
//! `now - entry` is folded into a running total and the entry is dropped.
//!
//! Vehicles still in flight when the phase ends are never reconciled and do
//! not contribute to the average.

use std::collections::HashSet;

use ct_core::VehicleId;

#[cfg(feature = "fx-hash")]
type EntryMap = rustc_hash::FxHashMap<VehicleId, f64>;
#[cfg(not(feature = "fx-hash"))]
type EntryMap = std::collections::HashMap<VehicleId, f64>;

/// A vehicle that left the network during a [`DwellTracker::reconcile`].
#[derive(Clone, Debug, PartialEq)]
pub struct Exit {
    pub vehicle:    VehicleId,
    pub dwell_secs: f64,
}

/// End-of-phase dwell figures.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DwellSummary {
    /// Vehicles reconciled as exited.
    pub exited:       u64,
    pub total_secs:   f64,
    /// `total_secs / exited`, or 0 when nothing exited.
    pub average_secs: f64,
    /// Vehicles still tracked (never reconciled).
    pub in_flight:    usize,
}

#[derive(Debug, Default)]
pub struct DwellTracker {
    entries:    EntryMap,
    total_secs: f64,
    exited:     u64,
}

impl DwellTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `now` as `vehicle`'s entry time unless it is already tracked.
    pub fn observe_active(&mut self, vehicle: &VehicleId, now: f64) {
        if !self.entries.contains_key(vehicle) {
            self.entries.insert(vehicle.clone(), now);
        }
    }

    /// Entry time of a tracked vehicle.
    #[inline]
    pub fn entry_time(&self, vehicle: &VehicleId) -> Option<f64> {
        self.entries.get(vehicle).copied()
    }

    /// Retire every tracked vehicle absent from `active_now`.
    ///
    /// Returns the exits in vehicle-id order.
    pub fn reconcile(&mut self, active_now: &[VehicleId], now: f64) -> Vec<Exit> {
        let active: HashSet<&VehicleId> = active_now.iter().collect();

        let mut exits: Vec<Exit> = Vec::new();
        self.entries.retain(|vehicle, entry| {
            if active.contains(vehicle) {
                return true;
            }
            exits.push(Exit { vehicle: vehicle.clone(), dwell_secs: now - *entry });
            false
        });
        exits.sort_by(|a, b| a.vehicle.cmp(&b.vehicle));

        for exit in &exits {
            self.total_secs += exit.dwell_secs;
            self.exited += 1;
        }
        exits
    }

    /// Mean dwell time over all exited vehicles; exactly 0 if none exited.
    pub fn average_dwell(&self) -> f64 {
        if self.exited == 0 {
            0.0
        } else {
            self.total_secs / self.exited as f64
        }
    }

    #[inline]
    pub fn in_flight(&self) -> usize {
        self.entries.len()
    }

    pub fn summary(&self) -> DwellSummary {
        DwellSummary {
            exited:       self.exited,
            total_secs:   self.total_secs,
            average_secs: self.average_dwell(),
            in_flight:    self.entries.len(),
        }
    }
}
