//! Compile, test and audit one submission inside a [`Workspace`].

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};
use util::execution_config::ExecutionConfig;
use util::identifier::{is_valid_identifier, validate_identifier};
use util::paths;

use crate::error::RunnerError;
use crate::outcome::{CompileOutcome, ExecutionResult, ProcessOutcome, ProcessStatus};
use crate::process::{CommandSpec, ProcessRunner};
use crate::request::GradingRequest;
use crate::workspace::Workspace;

/// Class name used when the submission declares none we can use.
pub const FALLBACK_CLASS_NAME: &str = "Xy";

const JUNIT_MAIN: &str = "org.junit.runner.JUnitCore";

static CLASS_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:\s*public)?\s*class\s+(\w[a-zA-Z0-9_]+)").expect("valid class regex")
});

/// Name of the first top-level class declared in `source`.
///
/// Falls back to [`FALLBACK_CLASS_NAME`] when no class is found, when the
/// name collides with the test class, or when it is not a plain identifier.
pub fn extract_class_name(source: &str, test_class_name: &str) -> String {
    CLASS_DECLARATION
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| *name != test_class_name && is_valid_identifier(name))
        .unwrap_or(FALLBACK_CLASS_NAME)
        .to_string()
}

pub struct Orchestrator {
    config: ExecutionConfig,
    runner: ProcessRunner,
}

impl Orchestrator {
    pub fn new(config: ExecutionConfig) -> Self {
        let runner = ProcessRunner::from_config(&config);
        Self { config, runner }
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Runs the whole cycle: compile submission, compile tests, run tests, audit.
    ///
    /// Stops at the first compile failure. Student-caused failures come back
    /// as an [`ExecutionResult`]; `Err` means the request could not be graded.
    pub async fn execute(
        &self,
        request: &GradingRequest,
        workspace: &mut Workspace,
    ) -> Result<ExecutionResult, RunnerError> {
        validate_identifier("testclassname", &request.test_class_name)
            .map_err(RunnerError::Configuration)?;

        let test_file = workspace.write_source(&request.test_class_name, &request.test_source)?;

        let class_name = extract_class_name(&request.submission_source, &request.test_class_name);
        let student_file = workspace.write_source(&class_name, &request.submission_source)?;
        debug!(class = %class_name, test_class = %request.test_class_name, "Wrote sources");

        let compiled = self.compile(workspace, &student_file).await?;
        let mut compile_time = compiled.elapsed_seconds;
        if compiled.has_errors {
            info!(class = %class_name, "Submission failed to compile");
            self.debug_log(workspace, &student_file, "compilerout", &compiled.diagnostic_text);
            return Ok(ExecutionResult::CompileStudentError {
                compiler_output: workspace.strip_path(&compiled.diagnostic_text),
            });
        }

        let compiled = self.compile(workspace, &test_file).await?;
        compile_time += compiled.elapsed_seconds;
        if compiled.has_errors {
            warn!(test_class = %request.test_class_name, "Test class failed to compile");
            self.debug_log(workspace, &test_file, "compilerout", &compiled.diagnostic_text);
            return Ok(ExecutionResult::CompileTestError {
                compiler_output: compiled.diagnostic_text,
            });
        }

        let test_run = self
            .run_checked(self.test_command(workspace.path(), &request.test_class_name), workspace.path())
            .await?;
        let junit_output = test_run.output_text();
        self.debug_log(workspace, &test_file, "junitout", &junit_output);

        let audit_run = self
            .run_checked(self.audit_command(&student_file), workspace.path())
            .await?;
        let audit_output = workspace.strip_path(&audit_run.output_text());

        if matches!(test_run.status, ProcessStatus::TimedOut | ProcessStatus::Signaled) {
            info!(status = ?test_run.status, "Test run did not finish");
            return Ok(ExecutionResult::TimeoutRunning);
        }

        Ok(ExecutionResult::Success {
            junit_output,
            audit_output,
            compile_time,
            test_run_time: test_run.elapsed_seconds(),
        })
    }

    async fn compile(&self, workspace: &Workspace, file: &Path) -> Result<CompileOutcome, RunnerError> {
        let toolchain = &self.config.toolchain;
        let spec = CommandSpec::new(&toolchain.javac)
            .arg("-nowarn")
            .arg("-cp")
            .arg(&toolchain.junit_jar)
            .arg("-sourcepath")
            .arg(workspace.path().display().to_string())
            .arg(file.display().to_string());

        let outcome = self.run_checked(spec, workspace.path()).await?;
        Ok(CompileOutcome::from(&outcome))
    }

    fn test_command(&self, workspace: &Path, test_class_name: &str) -> CommandSpec {
        let toolchain = &self.config.toolchain;
        let classpath = format!(
            "{}:{}:{}",
            toolchain.junit_jar,
            toolchain.hamcrest_jar,
            workspace.display()
        );

        CommandSpec::new(&toolchain.java)
            .arg(format!("-Xmx{}m", self.config.limits.memory_xmx_mb))
            .arg("-Djava.security.manager=default")
            .arg(format!("-Djava.security.policy={}", toolchain.policy_file))
            .arg("-cp")
            .arg(classpath)
            .arg(JUNIT_MAIN)
            .arg(test_class_name)
    }

    fn audit_command(&self, student_file: &Path) -> CommandSpec {
        CommandSpec::new(&self.config.toolchain.checkstyle)
            .arg("-c")
            .arg(&self.config.toolchain.checkstyle_config)
            .arg(student_file.display().to_string())
    }

    async fn run_checked(&self, spec: CommandSpec, working_dir: &Path) -> Result<ProcessOutcome, RunnerError> {
        let outcome = self
            .runner
            .run(
                &spec,
                working_dir,
                self.config.timeout(),
                self.config.output_limit_bytes(),
            )
            .await;

        if outcome.status == ProcessStatus::SpawnFailed {
            return Err(RunnerError::Spawn {
                command: spec.program,
                reason: outcome.output_text(),
            });
        }
        Ok(outcome)
    }

    fn debug_log(&self, workspace: &mut Workspace, file: &Path, suffix: &str, contents: &str) {
        if !self.config.debug.logfile {
            return;
        }
        if let Err(e) = workspace.write_debug_log(file, suffix, contents) {
            warn!(file = %paths::debug_log_path(file, suffix).display(), error = %e, "Failed to write debug log");
        }
    }
}
