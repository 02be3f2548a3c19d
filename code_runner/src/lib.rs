//! # Code Runner
//!
//! Compiles and tests untrusted Java submissions in a private workspace.
//!
//! - [`process`]: supervised subprocess execution with timeout and output cap.
//! - [`workspace`]: per-request scratch directory, removed on every exit path.
//! - [`orchestrator`]: compile submission → compile tests → run tests → audit.
//! - [`backend`]: local and remote execution behind one trait.

pub mod backend;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod process;
pub mod request;
pub mod workspace;

pub use backend::{ExecutionBackend, LocalBackend, RemoteBackend, RemoteRequest, select_backend};
pub use error::RunnerError;
pub use outcome::{ExecutionResult, ProcessOutcome, ProcessStatus, WireResult};
pub use request::{FeedbackLevel, GradingRequest};
