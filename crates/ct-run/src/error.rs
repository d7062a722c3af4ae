use ct_core::{CoreError, Phase};
use ct_engine::EngineError;
use ct_network::NetworkError;
use ct_output::OutputError;
use ct_track::TrackError;
use thiserror::Error;

use crate::RunState;

/// A failure that aborts one phase.
#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("adapter failure: {0}")]
    Adapter(#[from] EngineError),

    #[error("lane tracking failure: {0}")]
    Track(#[from] TrackError),

    #[error("export failure: {0}")]
    Output(#[from] OutputError),
}

impl PhaseError {
    /// Diagnostic category name.
    pub fn category(&self) -> &'static str {
        match self {
            PhaseError::Adapter(_) => "AdapterFailure",
            PhaseError::Track(TrackError::UnknownLane(_)) => "UnknownLaneReference",
            PhaseError::Track(TrackError::ZeroThreshold) => "Configuration",
            PhaseError::Output(_) => "ExportFailure",
        }
    }
}

/// A failure that aborts the whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("phase {phase} aborted: {source}")]
    Phase {
        phase:  Phase,
        #[source]
        source: PhaseError,
    },

    /// Building the phase-2 network or configuration failed.
    #[error("preparing phase 2 failed: {0}")]
    Prepare(#[from] NetworkError),

    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("run cannot start from state {0:?}")]
    State(RunState),
}

impl RunError {
    /// The phase this error belongs to, if any.
    ///
    /// A [`RunError::Prepare`] failure counts against phase 2, the phase
    /// whose inputs were being built, although the runner is still in
    /// `Phase1Analyzed` when it happens.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            RunError::Phase { phase, .. } => Some(*phase),
            RunError::Prepare(_) => Some(Phase::Two),
            RunError::Config(_) | RunError::State(_) => None,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            RunError::Phase { source, .. } => source.category(),
            RunError::Prepare(NetworkError::Io(_)) => "Io",
            RunError::Prepare(_) => "MalformedNetworkDocument",
            RunError::Config(_) | RunError::State(_) => "Configuration",
        }
    }
}

pub type RunResult<T> = Result<T, RunError>;
