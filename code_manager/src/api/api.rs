use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use code_runner::{
    ExecutionBackend, FeedbackLevel, GradingRequest, LocalBackend, RemoteRequest, RunnerError,
    WireResult,
};
use util::execution_config::ExecutionConfig;

use super::auth::{Credentials, ServiceAuth};

#[derive(Debug, Clone)]
pub struct AppState {
    pub execution: Arc<ExecutionConfig>,
    /// `None` disables authentication.
    pub credentials: Option<Credentials>,
}

impl AppState {
    pub fn new(execution: ExecutionConfig, credentials: Option<Credentials>) -> Self {
        Self {
            execution: Arc::new(execution),
            credentials,
        }
    }

    /// Server defaults with the limits requested by the client applied on top.
    /// Zero means "use the server default".
    fn config_for(&self, form: &RemoteRequest) -> ExecutionConfig {
        let mut config = (*self.execution).clone();
        if form.memory_xmx > 0 {
            config.limits.memory_xmx_mb = form.memory_xmx;
        }
        if form.memory_limit_output > 0 {
            config.limits.output_limit_kb = form.memory_limit_output;
        }
        if form.timeoutreal > 0 {
            config.limits.timeout_secs = form.timeoutreal;
        }
        config
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/run", post(run))
        .with_state(state)
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "code_manager is running")
}

pub async fn run(
    State(state): State<AppState>,
    _auth: ServiceAuth,
    Form(form): Form<RemoteRequest>,
) -> Response {
    tracing::info!(
        attempt_id = %form.attemptid,
        test_class = %form.testclassname,
        client_version = %form.clientversion,
        "Received grading request"
    );

    let config = state.config_for(&form);
    let request = GradingRequest::with_default_weight(
        form.studentscode.as_str(),
        form.testclassname.as_str(),
        form.junitcode.as_str(),
        FeedbackLevel::default(),
        &config,
    );
    let backend = LocalBackend::new(config);

    match backend.execute(&request, &form.attemptid).await {
        Ok(result) => (StatusCode::OK, Json(WireResult::from(result))).into_response(),
        Err(RunnerError::Configuration(msg)) => {
            tracing::warn!(attempt_id = %form.attemptid, error = %msg, "Rejected grading request");
            (StatusCode::BAD_REQUEST, msg).into_response()
        }
        Err(e) => {
            tracing::error!(attempt_id = %form.attemptid, error = %e, "Grading failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
