//! Errors raised by the execution pipeline.
//!
//! Student mistakes (compile errors, timeouts) are *not* errors here; they are
//! reported as an [`ExecutionResult`](crate::outcome::ExecutionResult).
//! [`RunnerError`] is reserved for faults that stop the request altogether.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    /// Request or configuration rejected before anything was executed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Workspace could not be created, written or removed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A toolchain command could not be started.
    #[error("Failed to spawn `{command}`: {reason}")]
    Spawn { command: String, reason: String },
}
