//! Adapter failures.  Every variant is fatal to the phase that hit it.

use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no simulation session is running")]
    NotStarted,

    #[error("a simulation session is already running")]
    AlreadyStarted,

    #[error("failed to launch {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("simulator exited before accepting a connection ({0})")]
    ExitedEarly(ExitStatus),

    #[error("could not connect to simulator on port {port} after {attempts} attempts")]
    Connect { port: u16, attempts: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("command 0x{command:02x} rejected: {message}")]
    Command { command: u8, message: String },

    #[error("protocol error: {0}")]
    Protocol(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
