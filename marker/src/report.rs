//! # Grade Report Module
//!
//! [`GradeResult`] is what a caller gets back for one graded submission: the
//! fraction, the kind of failure (if any) and the feedback text that was
//! stored for the attempt.
//!
//! ## JSON Output Example
//!
//! ```json
//! {
//!   "fraction": 0.55,
//!   "error_kind": null,
//!   "feedback": "Compiling: 0.4 s\nRunning tests: 0.2 s\n..."
//! }
//! ```

use code_runner::ExecutionResult;
use serde::Serialize;

/// Why a submission received no credit without its tests being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    CompileStudentError,
    CompileTestError,
    TimeoutRunning,
    RemoteServerError,
    ParseFailure,
}

impl ErrorKind {
    pub fn from_execution(result: &ExecutionResult) -> Option<Self> {
        match result {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::CompileStudentError { .. } => Some(ErrorKind::CompileStudentError),
            ExecutionResult::CompileTestError { .. } => Some(ErrorKind::CompileTestError),
            ExecutionResult::TimeoutRunning => Some(ErrorKind::TimeoutRunning),
            ExecutionResult::RemoteServerError { .. } => Some(ErrorKind::RemoteServerError),
        }
    }
}

/// Closing phrase of every successful grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    FullyCorrect,
    PartiallyCorrect,
    WrongAnswer,
}

impl Verdict {
    pub fn decide(total_tests: u32, total_errors: u32, findings: u32) -> Self {
        if total_tests > 0 && total_errors == 0 && findings == 0 {
            Verdict::FullyCorrect
        } else if total_tests > 0 && (total_errors > 0 || findings > 0) {
            Verdict::PartiallyCorrect
        } else {
            Verdict::WrongAnswer
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeResult {
    pub fraction: f64,
    pub error_kind: Option<ErrorKind>,
    pub feedback: String,
}

impl GradeResult {
    pub fn failed(kind: ErrorKind, feedback: String) -> Self {
        Self {
            fraction: 0.0,
            error_kind: Some(kind),
            feedback,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_kind.is_some()
    }
}
