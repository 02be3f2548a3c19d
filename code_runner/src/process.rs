//! Supervised subprocess execution.
//!
//! [`ProcessRunner::run`] spawns one command, drains its stdout and stderr
//! into a single buffer in arrival order and enforces a wall-clock timeout
//! and a cumulative output cap. The loop never blocks for longer than the
//! configured poll interval, so a silent or hung child is always noticed.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};
use util::execution_config::ExecutionConfig;

use crate::outcome::{ProcessOutcome, ProcessStatus};

const READ_CHUNK: usize = 8 * 1024;

/// A program and its arguments. Arguments are never interpreted by a shell
/// unless a pre-command is configured, in which case they are escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The command as a single shell-safe line.
    pub fn shell_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| shell_escape::escape(Cow::from(part.as_str())).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shell_line())
    }
}

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    precommand: String,
    poll_interval: Duration,
}

impl ProcessRunner {
    pub fn new(precommand: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            precommand: precommand.into(),
            poll_interval,
        }
    }

    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self::new(config.toolchain.precommand.clone(), config.poll_interval())
    }

    fn build_command(&self, spec: &CommandSpec, working_dir: &Path) -> Command {
        let mut command = if self.precommand.trim().is_empty() {
            let mut command = Command::new(&spec.program);
            command.args(&spec.args);
            command
        } else {
            let mut command = Command::new("sh");
            command
                .arg("-c")
                .arg(format!("{}; exec {}", self.precommand, spec.shell_line()));
            command
        };

        command
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// Runs `spec` in `working_dir` until it exits, exceeds `time_limit` or
    /// writes more than `output_limit` bytes.
    ///
    /// Checks happen in a fixed order on every pass: timeout, output limit,
    /// exit. When a limit and an exit are observed in the same pass the limit
    /// wins. The child is always reaped before this returns.
    pub async fn run(
        &self,
        spec: &CommandSpec,
        working_dir: &Path,
        time_limit: Duration,
        output_limit: usize,
    ) -> ProcessOutcome {
        let start = Instant::now();

        let mut child = match self.build_command(spec, working_dir).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(command = %spec, error = %e, "Failed to spawn process");
                return ProcessOutcome {
                    status: ProcessStatus::SpawnFailed,
                    combined_output: e.to_string().into_bytes(),
                    elapsed: start.elapsed(),
                };
            }
        };
        debug!(command = %spec, pid = ?child.id(), "Spawned process");

        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();
        let mut output: Vec<u8> = Vec::new();
        let mut out_buf = vec![0u8; READ_CHUNK];
        let mut err_buf = vec![0u8; READ_CHUNK];

        let status = loop {
            tokio::select! {
                read = read_chunk(&mut stdout, &mut out_buf), if stdout.is_some() => {
                    absorb(read, &out_buf, &mut output, &mut stdout);
                }
                read = read_chunk(&mut stderr, &mut err_buf), if stderr.is_some() => {
                    absorb(read, &err_buf, &mut output, &mut stderr);
                }
                _ = sleep(self.poll_interval) => {}
            }

            let elapsed = start.elapsed();
            if elapsed >= time_limit {
                warn!(command = %spec, elapsed_ms = elapsed.as_millis() as u64, "Process timed out");
                terminate(&mut child).await;
                break ProcessStatus::TimedOut;
            }

            if output.len() > output_limit {
                warn!(command = %spec, bytes = output.len(), "Process exceeded output limit");
                terminate(&mut child).await;
                break ProcessStatus::OutputLimitExceeded;
            }

            if stdout.is_none() && stderr.is_none() {
                // Both pipes closed: the child is exiting. Wait for it, but not past the deadline.
                match timeout(time_limit.saturating_sub(elapsed), child.wait()).await {
                    Ok(Ok(exit)) => break classify(exit),
                    Ok(Err(e)) => {
                        warn!(command = %spec, error = %e, "Failed to collect exit status");
                        terminate(&mut child).await;
                        break ProcessStatus::Signaled;
                    }
                    Err(_) => {
                        warn!(command = %spec, "Process timed out after closing its output");
                        terminate(&mut child).await;
                        break ProcessStatus::TimedOut;
                    }
                }
            }

            match child.try_wait() {
                Ok(Some(exit)) => {
                    // Exited while a pipe is still held open (e.g. by a grandchild).
                    self.drain(&mut stdout, &mut stderr, &mut output).await;
                    break classify(exit);
                }
                Ok(None) => {}
                Err(e) => warn!(command = %spec, error = %e, "Failed to poll process status"),
            }
        };

        let elapsed = start.elapsed();
        debug!(
            command = %spec,
            status = ?status,
            bytes = output.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Process finished"
        );

        ProcessOutcome {
            status,
            combined_output: output,
            elapsed,
        }
    }

    /// Collects what is left in the pipes for at most one poll interval.
    async fn drain<O, E>(&self, stdout: &mut Option<O>, stderr: &mut Option<E>, output: &mut Vec<u8>)
    where
        O: AsyncRead + Unpin,
        E: AsyncRead + Unpin,
    {
        let mut rest_out = Vec::new();
        let mut rest_err = Vec::new();
        let _ = timeout(self.poll_interval, async {
            if let Some(out) = stdout.as_mut() {
                let _ = out.read_to_end(&mut rest_out).await;
            }
            if let Some(err) = stderr.as_mut() {
                let _ = err.read_to_end(&mut rest_err).await;
            }
        })
        .await;

        output.extend_from_slice(&rest_out);
        output.extend_from_slice(&rest_err);
        *stdout = None;
        *stderr = None;
    }
}

async fn read_chunk<R: AsyncRead + Unpin>(
    stream: &mut Option<R>,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    match stream.as_mut() {
        Some(s) => s.read(buf).await,
        None => std::future::pending().await,
    }
}

fn absorb<R>(read: std::io::Result<usize>, buf: &[u8], output: &mut Vec<u8>, stream: &mut Option<R>) {
    match read {
        Ok(0) | Err(_) => *stream = None,
        Ok(n) => output.extend_from_slice(&buf[..n]),
    }
}

async fn terminate(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        debug!(error = %e, "Kill failed, process probably already exited");
    }
    let _ = child.wait().await;
}

#[cfg(unix)]
fn classify(exit: ExitStatus) -> ProcessStatus {
    use std::os::unix::process::ExitStatusExt;
    if exit.signal().is_some() {
        ProcessStatus::Signaled
    } else {
        ProcessStatus::Succeeded
    }
}

#[cfg(not(unix))]
fn classify(_exit: ExitStatus) -> ProcessStatus {
    ProcessStatus::Succeeded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_line_escapes_arguments() {
        let spec = CommandSpec::new("java")
            .arg("-cp")
            .arg("/opt/junit.jar")
            .arg("it's");
        assert_eq!(spec.shell_line(), "java -cp /opt/junit.jar 'it'\\''s'");
    }

    #[test]
    fn test_display_matches_shell_line() {
        let spec = CommandSpec::new("javac").arg("-nowarn");
        assert_eq!(spec.to_string(), "javac -nowarn");
    }
}
