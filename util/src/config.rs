//! Service configuration.
//!
//! `AppConfig` holds the settings of the grading service binary (bind
//! address, logging, credentials). Grading itself is driven by
//! [`ExecutionConfig`](crate::execution_config::ExecutionConfig), which the
//! service loads from `execution_config_path` when set.

use std::env;

use crate::execution_config::ExecutionConfig;

/// Represents the complete service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub host: String,
    pub port: u16,
    pub auth_user: String,
    pub auth_password: String,
    pub execution_config_path: String,
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        Ok(Self {
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "code-manager".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "code_manager=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "code_manager.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            host: env::var("CODE_MANAGER_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("CODE_MANAGER_PORT")
                .unwrap_or_else(|_| "3001".into())
                .parse()
                .map_err(|e| format!("Invalid CODE_MANAGER_PORT: {e}"))?,
            auth_user: env::var("CODE_MANAGER_USER").unwrap_or_default(),
            auth_password: env::var("CODE_MANAGER_PASSWORD").unwrap_or_default(),
            execution_config_path: env::var("GRADER_CONFIG").unwrap_or_default(),
        })
    }

    /// The grading configuration for this service: the file at
    /// `execution_config_path` (if any) with `GRADER_*` overrides applied.
    pub fn execution_config(&self) -> Result<ExecutionConfig, String> {
        let base = Some(self.execution_config_path.as_str()).filter(|p| !p.is_empty());
        ExecutionConfig::load(base)
    }

    /// Credentials are only enforced when a user name is configured.
    pub fn requires_auth(&self) -> bool {
        !self.auth_user.is_empty()
    }
}
