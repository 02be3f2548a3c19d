use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use util::execution_config::ExecutionConfig;

use super::ExecutionBackend;
use crate::error::RunnerError;
use crate::outcome::{ExecutionResult, WireResult};
use crate::request::GradingRequest;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_REDIRECTS: usize = 10;

/// Form body posted to a remote grading service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RemoteRequest {
    pub clientversion: String,
    pub attemptid: String,
    pub testclassname: String,
    pub studentscode: String,
    pub junitcode: String,
    pub memory_xmx: u64,
    pub memory_limit_output: u64,
    pub timeoutreal: u64,
}

impl RemoteRequest {
    pub fn new(request: &GradingRequest, request_id: &str, config: &ExecutionConfig) -> Self {
        Self {
            clientversion: config.remote.client_version.clone(),
            attemptid: request_id.to_string(),
            testclassname: request.test_class_name.clone(),
            studentscode: request.submission_source.clone(),
            junitcode: request.test_source.clone(),
            memory_xmx: config.limits.memory_xmx_mb,
            memory_limit_output: config.limits.output_limit_kb,
            timeoutreal: config.limits.timeout_secs,
        }
    }
}

/// Delegates the whole cycle to a grading service with a single HTTP POST.
///
/// Every failure on the way (connection, status, body) becomes a
/// [`ExecutionResult::RemoteServerError`]; nothing is retried.
pub struct RemoteBackend {
    config: ExecutionConfig,
    client: Client,
}

impl RemoteBackend {
    pub fn new(config: ExecutionConfig) -> Result<Self, RunnerError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout().saturating_mul(2))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| RunnerError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    async fn post(&self, form: &RemoteRequest) -> Result<String, String> {
        let remote = &self.config.remote;
        let response = self
            .client
            .post(remote.server.trim())
            .basic_auth(&remote.user, Some(&remote.password))
            .form(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "Remote grading service returned an error");
            return Err(body);
        }
        Ok(body)
    }
}

#[async_trait]
impl ExecutionBackend for RemoteBackend {
    async fn execute(
        &self,
        request: &GradingRequest,
        request_id: &str,
    ) -> Result<ExecutionResult, RunnerError> {
        let form = RemoteRequest::new(request, request_id, &self.config);
        debug!(request_id, server = %self.config.remote.server, "Posting to remote grading service");

        let body = match self.post(&form).await {
            Ok(body) => body,
            Err(message) => return Ok(ExecutionResult::RemoteServerError { message }),
        };

        match serde_json::from_str::<WireResult>(&body) {
            Ok(wire) => Ok(ExecutionResult::from(wire)),
            Err(e) => {
                warn!(request_id, error = %e, "Undecodable remote response");
                Ok(ExecutionResult::RemoteServerError {
                    message: "JSON decoding error".to_string(),
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
