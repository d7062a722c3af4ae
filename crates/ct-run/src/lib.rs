//! `ct-run`: the analyze → mutate → re-simulate control flow.
//!
//! # Two-phase run
//!
//! ```text
//! Idle
//!  └─ Phase1Running   run_phase(threshold = 1000, original config)
//!                       → output1.csv
//!  └─ Phase1Analyzed  blocked = lanes with final status 4
//!                       → updated network (blocked lanes disallow="all")
//!                       → updated config (network reference swapped)
//!  └─ Phase2Running   run_phase(threshold = 10000, updated config)
//!                       → output2.csv
//!  └─ Done
//! ```
//!
//! # Per-step procedure
//!
//! ```text
//! while engine.min_expected_remaining() > 0:
//!   ① step the engine, read the clock and the active vehicles
//!   ② record entry time of every newly seen vehicle
//!   ③ per vehicle: count a pass on its lane, then capture its record
//!   ④ reconcile exits against the active set
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ct_core::RunConfig;
//! use ct_engine::TraciEngine;
//! use ct_run::{NoopObserver, Runner};
//!
//! let config = RunConfig::from_json_file(path)?;
//! let engine = TraciEngine::new(&config.sumo_binary);
//! let report = Runner::new(config, engine)?.run(&mut NoopObserver)?;
//! ```

pub mod error;
pub mod observer;
pub mod phase;
pub mod runner;


pub use error::{PhaseError, RunError, RunResult};
pub use observer::{NoopObserver, RunObserver};
pub use phase::{PhaseOutcome, PhaseReport, run_phase};
pub use runner::{RunReport, RunState, Runner};
