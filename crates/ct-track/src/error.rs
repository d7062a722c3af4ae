use ct_core::LaneId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    /// The engine reported a vehicle on a lane that was not enumerated at
    /// phase start: the network and the running simulation disagree.
    #[error("unknown lane reference {0:?}")]
    UnknownLane(LaneId),

    #[error("threshold per status level must be greater than zero")]
    ZeroThreshold,
}

pub type TrackResult<T> = Result<T, TrackError>;
