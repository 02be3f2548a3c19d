//! Marker Error Types
//!
//! [`MarkerError`] covers everything that stops a submission from being
//! graded. Student mistakes are not errors: they produce a zero-fraction
//! [`GradeResult`](crate::report::GradeResult) with an error kind instead.
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//!
//! fn require_banner(text: &str) -> Result<(), MarkerError> {
//!     if !text.contains("JUnit version") {
//!         return Err(MarkerError::ParseFailure("no test runner banner".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use code_runner::RunnerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkerError {
    /// Request rejected before execution (bad identifier, invalid setup).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Test runner output does not contain a usable result line.
    #[error("Could not parse test output: {0}")]
    ParseFailure(String),

    /// Execution failed for reasons other than the submission itself.
    #[error(transparent)]
    Runner(RunnerError),

    /// The feedback record could not be stored.
    #[error("Feedback store error: {0}")]
    Store(String),
}

impl From<RunnerError> for MarkerError {
    fn from(err: RunnerError) -> Self {
        match err {
            RunnerError::Configuration(msg) => MarkerError::Configuration(msg),
            other => MarkerError::Runner(other),
        }
    }
}
