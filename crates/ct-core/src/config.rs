//! Run configuration.
//!
//! # Design
//!
//! A run is two sequential phases over the same scenario.  Phase 1 uses the
//! scenario's own simulation config; phase 2 uses a rewritten copy that points
//! at the network with congested lanes blocked.  Everything that differs
//! between the two phases is captured in a [`PhaseSettings`], derived from the
//! single [`RunConfig`] by [`RunConfig::phase`].
//!
//! `RunConfig` is loaded from JSON by the application crate.  Every field has
//! a default, so `{}` describes the stock scenario layout:
//!
//! ```json
//! {
//!   "work_dir": "scenario",
//!   "phase1_threshold": 1000,
//!   "phase2_threshold": 10000
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

// ── Phase ─────────────────────────────────────────────────────────────────────

/// Which of the two simulation runs is executing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    One,
    Two,
}

impl Phase {
    /// 1-based phase number, as used in output names and diagnostics.
    pub fn number(self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ── PhaseSettings ─────────────────────────────────────────────────────────────

/// Explicit inputs of one phase of the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseSettings {
    pub phase: Phase,
    /// Simulation configuration handed to the engine's `start`.
    pub config: PathBuf,
    /// Cumulative passes per status level on a single lane.
    pub threshold_per_level: u64,
    /// Where the phase's telemetry CSV is written.
    pub output_csv: PathBuf,
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration of a two-phase run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory containing the scenario.  All other paths are relative to it.
    pub work_dir: PathBuf,

    /// Simulator executable (looked up on `PATH` when not absolute).
    pub sumo_binary: PathBuf,

    /// Original simulation configuration file.
    pub sumo_config: String,

    /// Original (gzip-compressed) network file.  This exact string is also
    /// the reference replaced inside the simulation configuration.
    pub network: String,

    /// File name of the mutated network written before phase 2.
    pub updated_network: String,

    /// File name of the rewritten simulation configuration used by phase 2.
    pub updated_config: String,

    pub phase1_output: String,
    pub phase2_output: String,

    /// Passes per status level in phase 1.  Default: 1000.
    pub phase1_threshold: u64,

    /// Passes per status level in phase 2.  Default: 10000.
    pub phase2_threshold: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            work_dir:         PathBuf::from("."),
            sumo_binary:      PathBuf::from("sumo"),
            sumo_config:      "osm.sumocfg".into(),
            network:          "osm.net.xml.gz".into(),
            updated_network:  "updated_net.xml.gz".into(),
            updated_config:   "updated_osm.sumocfg".into(),
            phase1_output:    "output1.csv".into(),
            phase2_output:    "output2.csv".into(),
            phase1_threshold: 1_000,
            phase2_threshold: 10_000,
        }
    }
}

impl RunConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        let config: RunConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.phase1_threshold == 0 || self.phase2_threshold == 0 {
            return Err(CoreError::Config(
                "per-level thresholds must be greater than zero".into(),
            ));
        }
        if self.network == self.updated_network {
            return Err(CoreError::Config(format!(
                "updated_network {:?} would overwrite the original network",
                self.updated_network
            )));
        }
        if self.sumo_config == self.updated_config {
            return Err(CoreError::Config(format!(
                "updated_config {:?} would overwrite the original configuration",
                self.updated_config
            )));
        }
        if self.network.is_empty() {
            return Err(CoreError::Config("network reference must not be empty".into()));
        }
        Ok(())
    }

    pub fn network_path(&self) -> PathBuf {
        self.work_dir.join(&self.network)
    }

    pub fn updated_network_path(&self) -> PathBuf {
        self.work_dir.join(&self.updated_network)
    }

    pub fn sumo_config_path(&self) -> PathBuf {
        self.work_dir.join(&self.sumo_config)
    }

    pub fn updated_config_path(&self) -> PathBuf {
        self.work_dir.join(&self.updated_config)
    }

    /// Derive the settings of `phase`.
    ///
    /// Phase 2 runs from the rewritten configuration, which only exists once
    /// phase 1 has been analyzed.
    pub fn phase(&self, phase: Phase) -> PhaseSettings {
        match phase {
            Phase::One => PhaseSettings {
                phase,
                config:              self.sumo_config_path(),
                threshold_per_level: self.phase1_threshold,
                output_csv:          self.work_dir.join(&self.phase1_output),
            },
            Phase::Two => PhaseSettings {
                phase,
                config:              self.updated_config_path(),
                threshold_per_level: self.phase2_threshold,
                output_csv:          self.work_dir.join(&self.phase2_output),
            },
        }
    }
}
