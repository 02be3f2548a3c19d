use async_trait::async_trait;
use tracing::{info, warn};
use util::execution_config::ExecutionConfig;

use super::ExecutionBackend;
use crate::error::RunnerError;
use crate::orchestrator::Orchestrator;
use crate::outcome::ExecutionResult;
use crate::request::GradingRequest;
use crate::workspace::Workspace;

/// Runs the toolchain on this machine, one fresh workspace per request.
pub struct LocalBackend {
    orchestrator: Orchestrator,
}

impl LocalBackend {
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            orchestrator: Orchestrator::new(config),
        }
    }
}

#[async_trait]
impl ExecutionBackend for LocalBackend {
    async fn execute(
        &self,
        request: &GradingRequest,
        request_id: &str,
    ) -> Result<ExecutionResult, RunnerError> {
        let config = self.orchestrator.config();
        let mut workspace =
            Workspace::create(&config.workspace_root, request_id, config.debug.nocleanup)?;

        // On error the workspace is dropped here, which removes it.
        let result = self.orchestrator.execute(request, &mut workspace).await?;

        if let Err(e) = workspace.destroy() {
            warn!(request_id, error = %e, "Failed to remove workspace");
        }
        info!(request_id, result = result_kind(&result), "Local execution finished");
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

fn result_kind(result: &ExecutionResult) -> &'static str {
    match result {
        ExecutionResult::Success { .. } => "success",
        ExecutionResult::CompileStudentError { .. } => "compile_student_error",
        ExecutionResult::CompileTestError { .. } => "compile_test_error",
        ExecutionResult::TimeoutRunning => "timeout_running",
        ExecutionResult::RemoteServerError { .. } => "remote_server_error",
    }
}
