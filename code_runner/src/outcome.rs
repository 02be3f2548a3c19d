//! Outcome types produced by the execution pipeline.
//!
//! [`ProcessOutcome`] describes one supervised command, [`CompileOutcome`] one
//! compiler invocation and [`ExecutionResult`] a whole compile/test/audit
//! cycle. [`WireResult`] is the JSON shape exchanged with the remote grading
//! service; both backends end up producing an [`ExecutionResult`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const COMPILE_STUDENT_ERROR: &str = "COMPILE_STUDENT_ERROR";
pub const COMPILE_TESTFILE_ERROR: &str = "COMPILE_TESTFILE_ERROR";
pub const TIMEOUT_RUNNING: &str = "TIMEOUT_RUNNING";
pub const REMOTE_SERVER_ERROR: &str = "REMOTE_SERVER_ERROR";

/// How a supervised command ended. Exactly one applies per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Succeeded,
    TimedOut,
    OutputLimitExceeded,
    Signaled,
    SpawnFailed,
}

#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub status: ProcessStatus,
    /// stdout and stderr interleaved in arrival order.
    pub combined_output: Vec<u8>,
    pub elapsed: Duration,
}

impl ProcessOutcome {
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.combined_output).into_owned()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompileOutcome {
    pub has_errors: bool,
    pub diagnostic_text: String,
    pub elapsed_seconds: f64,
}

impl From<&ProcessOutcome> for CompileOutcome {
    /// The compiler runs with `-nowarn`, so any output at all is a diagnostic.
    /// A compiler that failed silently (killed, timed out) still counts as an error.
    fn from(outcome: &ProcessOutcome) -> Self {
        let mut diagnostic_text = outcome.output_text();
        if outcome.status != ProcessStatus::Succeeded && diagnostic_text.trim().is_empty() {
            diagnostic_text = "error (timeout?)".to_string();
        }

        Self {
            has_errors: !diagnostic_text.trim().is_empty(),
            diagnostic_text,
            elapsed_seconds: outcome.elapsed_seconds(),
        }
    }
}

/// Result of one compile/test/audit cycle, local or remote.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    Success {
        junit_output: String,
        audit_output: String,
        compile_time: f64,
        test_run_time: f64,
    },
    CompileStudentError {
        compiler_output: String,
    },
    CompileTestError {
        compiler_output: String,
    },
    TimeoutRunning,
    RemoteServerError {
        message: String,
    },
}

/// JSON representation of an [`ExecutionResult`] used by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WireResult {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errortype: Option<String>,
    pub compileroutput: String,
    pub junitoutput: String,
    pub auditoutput: String,
    pub compiletime: f64,
    pub testruntime: f64,
    pub message: String,
}

impl From<ExecutionResult> for WireResult {
    fn from(result: ExecutionResult) -> Self {
        match result {
            ExecutionResult::Success {
                junit_output,
                audit_output,
                compile_time,
                test_run_time,
            } => WireResult {
                error: false,
                junitoutput: junit_output,
                auditoutput: audit_output,
                compiletime: compile_time,
                testruntime: test_run_time,
                ..Default::default()
            },
            ExecutionResult::CompileStudentError { compiler_output } => WireResult {
                error: true,
                errortype: Some(COMPILE_STUDENT_ERROR.to_string()),
                compileroutput: compiler_output,
                ..Default::default()
            },
            ExecutionResult::CompileTestError { compiler_output } => WireResult {
                error: true,
                errortype: Some(COMPILE_TESTFILE_ERROR.to_string()),
                compileroutput: compiler_output,
                ..Default::default()
            },
            ExecutionResult::TimeoutRunning => WireResult {
                error: true,
                errortype: Some(TIMEOUT_RUNNING.to_string()),
                ..Default::default()
            },
            ExecutionResult::RemoteServerError { message } => WireResult {
                error: true,
                errortype: Some(REMOTE_SERVER_ERROR.to_string()),
                message,
                ..Default::default()
            },
        }
    }
}

impl From<WireResult> for ExecutionResult {
    fn from(wire: WireResult) -> Self {
        if !wire.error {
            return ExecutionResult::Success {
                junit_output: wire.junitoutput,
                audit_output: wire.auditoutput,
                compile_time: wire.compiletime,
                test_run_time: wire.testruntime,
            };
        }

        match wire.errortype.as_deref() {
            Some(COMPILE_STUDENT_ERROR) => ExecutionResult::CompileStudentError {
                compiler_output: wire.compileroutput,
            },
            Some(COMPILE_TESTFILE_ERROR) => ExecutionResult::CompileTestError {
                compiler_output: wire.compileroutput,
            },
            Some(TIMEOUT_RUNNING) => ExecutionResult::TimeoutRunning,
            Some(REMOTE_SERVER_ERROR) => ExecutionResult::RemoteServerError {
                message: wire.message,
            },
            other => ExecutionResult::RemoteServerError {
                message: format!("unknown errortype {:?}: {}", other, wire.message),
            },
        }
    }
}
