//! Execution backends.
//!
//! Both backends turn a [`GradingRequest`] into an [`ExecutionResult`]; the
//! caller never needs to know which one ran. [`select_backend`] picks one from
//! configuration.

mod local;
mod remote;

pub use local::LocalBackend;
pub use remote::{RemoteBackend, RemoteRequest};

use async_trait::async_trait;
use tracing::info;
use util::execution_config::ExecutionConfig;

use crate::error::RunnerError;
use crate::outcome::ExecutionResult;
use crate::request::GradingRequest;

#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Compiles, tests and audits `request`.
    ///
    /// `request_id` must be unique per request; it names the workspace and is
    /// forwarded to remote services.
    async fn execute(
        &self,
        request: &GradingRequest,
        request_id: &str,
    ) -> Result<ExecutionResult, RunnerError>;

    fn name(&self) -> &'static str;
}

/// Remote when `remote.server` is set, local otherwise.
pub fn select_backend(config: &ExecutionConfig) -> Result<Box<dyn ExecutionBackend>, RunnerError> {
    let backend: Box<dyn ExecutionBackend> = if config.is_remote() {
        Box::new(RemoteBackend::new(config.clone())?)
    } else {
        Box::new(LocalBackend::new(config.clone()))
    };
    info!(backend = backend.name(), "Selected execution backend");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_server_selects_local() {
        let config = ExecutionConfig::default_config();
        assert_eq!(select_backend(&config).unwrap().name(), "local");
    }

    #[test]
    fn test_server_selects_remote() {
        let mut config = ExecutionConfig::default_config();
        config.remote.server = "http://127.0.0.1:9/run".into();
        assert_eq!(select_backend(&config).unwrap().name(), "remote");
    }
}
