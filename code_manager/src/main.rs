use std::net::SocketAddr;

use code_manager::api::{AppState, auth::Credentials, routes};
use tokio::net::TcpListener;
use tracing_appender::rolling;
use util::config::AppConfig;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("Invalid service configuration");
    let _log_guard = init_logging(&config);

    let execution = config
        .execution_config()
        .expect("Invalid grading configuration");
    let credentials = config
        .requires_auth()
        .then(|| Credentials::new(config.auth_user.clone(), config.auth_password.clone()));
    if credentials.is_none() {
        tracing::warn!("No CODE_MANAGER_USER set, /run accepts unauthenticated requests");
    }

    let app = routes(AppState::new(execution, credentials));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid address");
    tracing::info!(project = %config.project_name, %addr, "Listening");

    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server crashed");
}

fn init_logging(config: &AppConfig) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", &config.log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true);

    let env_filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config.log_to_stdout {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
