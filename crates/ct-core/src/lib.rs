//! `ct-core`: foundational types shared by every `ct-*` crate.
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `LaneId`, `VehicleId`                                 |
//! | [`geo`]     | `SimPosition` (simulation plane), `GeoPoint` (lon/lat)|
//! | [`config`]  | `Phase`, `PhaseSettings`, `RunConfig`                 |
//! | [`error`]   | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{Phase, PhaseSettings, RunConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, SimPosition};
pub use ids::{LaneId, VehicleId};
