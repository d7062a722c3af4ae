//! `ct-engine`: the narrow interface through which the pipeline drives a
//! traffic simulator.
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`engine`]  | `SimulationEngine` trait, `VehicleObservation`                  |
//! | [`traci`]   | `TraciEngine`: spawns `sumo` and speaks TraCI over TCP         |
//! | [`error`]   | `EngineError`, `EngineResult<T>`                                |
//!
//! The simulator itself is never reimplemented here; any other backend (a
//! replay of recorded traces, a test double) only has to implement
//! [`SimulationEngine`].

pub mod engine;
pub mod error;
pub mod traci;


pub use engine::{SimulationEngine, VehicleObservation};
pub use error::{EngineError, EngineResult};
pub use traci::TraciEngine;
