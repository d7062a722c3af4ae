//! The simulation engine adapter.

use std::path::Path;

use ct_core::{GeoPoint, LaneId, SimPosition, VehicleId};

use crate::EngineResult;

/// Everything read about one active vehicle during a step.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleObservation {
    pub vehicle:   VehicleId,
    pub position:  SimPosition,
    /// Metres per second, as reported by the engine.
    pub speed_mps: f64,
    pub road:      String,
    pub lane:      LaneId,
}

/// Operations the pipeline needs from a running traffic simulation.
///
/// Calls are synchronous; `simulation_step` blocks until the engine has
/// advanced.  Any error aborts the current phase.
pub trait SimulationEngine {
    /// Launch a session for the given simulation configuration.
    fn start(&mut self, config: &Path) -> EngineResult<()>;

    /// End the session.  Must leave the engine ready for another `start`.
    fn close(&mut self) -> EngineResult<()>;

    /// Advance by one simulation step.
    fn simulation_step(&mut self) -> EngineResult<()>;

    /// Vehicles still running plus those waiting to depart.  The phase ends
    /// when this reaches zero.
    fn min_expected_remaining(&mut self) -> EngineResult<i32>;

    /// Simulation clock, in seconds.
    fn current_time(&mut self) -> EngineResult<f64>;

    /// Every lane of the loaded network.
    fn lane_ids(&mut self) -> EngineResult<Vec<LaneId>>;

    /// Vehicles currently active in the network, in engine order.
    fn vehicle_ids(&mut self) -> EngineResult<Vec<VehicleId>>;

    fn vehicle_position(&mut self, vehicle: &VehicleId) -> EngineResult<SimPosition>;

    /// Metres per second.
    fn vehicle_speed(&mut self, vehicle: &VehicleId) -> EngineResult<f64>;

    fn vehicle_road_id(&mut self, vehicle: &VehicleId) -> EngineResult<String>;

    fn vehicle_lane_id(&mut self, vehicle: &VehicleId) -> EngineResult<LaneId>;

    /// Project a simulation-plane position to longitude/latitude.
    fn project_to_geo(&mut self, position: SimPosition) -> EngineResult<GeoPoint>;

    /// Read the full per-step state of `vehicle`.
    fn observe_vehicle(&mut self, vehicle: &VehicleId) -> EngineResult<VehicleObservation> {
        Ok(VehicleObservation {
            vehicle:   vehicle.clone(),
            position:  self.vehicle_position(vehicle)?,
            speed_mps: self.vehicle_speed(vehicle)?,
            road:      self.vehicle_road_id(vehicle)?,
            lane:      self.vehicle_lane_id(vehicle)?,
        })
    }
}
