use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

/// Paths and commands for the Java toolchain used to compile, test and audit submissions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Toolchain {
    #[serde(default = "default_javac")]
    pub javac: String,

    #[serde(default = "default_java")]
    pub java: String,

    #[serde(default = "default_junit_jar")]
    pub junit_jar: String,

    #[serde(default = "default_hamcrest_jar")]
    pub hamcrest_jar: String,

    /// Java security policy applied to the test runner.
    #[serde(default = "default_policy_file")]
    pub policy_file: String,

    #[serde(default = "default_checkstyle")]
    pub checkstyle: String,

    #[serde(default = "default_checkstyle_config")]
    pub checkstyle_config: String,

    /// Shell snippet run before every command (e.g. `ulimit -f 1024`).
    /// Empty means commands are spawned directly without a shell.
    #[serde(default)]
    pub precommand: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            javac: default_javac(),
            java: default_java(),
            junit_jar: default_junit_jar(),
            hamcrest_jar: default_hamcrest_jar(),
            policy_file: default_policy_file(),
            checkstyle: default_checkstyle(),
            checkstyle_config: default_checkstyle_config(),
            precommand: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionLimits {
    /// Wall-clock limit for every supervised command.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Heap size handed to the test runner JVM (`-Xmx<n>m`).
    #[serde(default = "default_memory_xmx_mb")]
    pub memory_xmx_mb: u64,

    /// Combined stdout+stderr cap, in KiB.
    #[serde(default = "default_output_limit_kb")]
    pub output_limit_kb: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            memory_xmx_mb: default_memory_xmx_mb(),
            output_limit_kb: default_output_limit_kb(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringOptions {
    /// Audit findings beyond this count no longer lower the style score.
    #[serde(default = "default_max_audit_findings")]
    pub max_audit_findings: u32,

    /// Audit weight used when a question does not set its own.
    #[serde(default = "default_audit_weight")]
    pub default_audit_weight: f64,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            max_audit_findings: default_max_audit_findings(),
            default_audit_weight: default_audit_weight(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DebugOptions {
    /// Write compiler and test runner output to log files inside the workspace.
    #[serde(default)]
    pub logfile: bool,

    /// Keep the workspace on disk after grading.
    #[serde(default)]
    pub nocleanup: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteOptions {
    /// URL of the remote grading service. Empty selects the local backend.
    #[serde(default)]
    pub server: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_client_version")]
    pub client_version: String,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            server: String::new(),
            user: String::new(),
            password: String::new(),
            client_version: default_client_version(),
        }
    }
}

/// Everything the grading pipeline needs to know about its environment.
///
/// Built once by the caller and handed to each component; nothing in the
/// pipeline reads process-wide state on its own.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub toolchain: Toolchain,

    #[serde(default)]
    pub limits: ExecutionLimits,

    #[serde(default)]
    pub scoring: ScoringOptions,

    #[serde(default)]
    pub debug: DebugOptions,

    #[serde(default)]
    pub remote: RemoteOptions,

    /// Parent directory of all per-request workspaces.
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl ExecutionConfig {
    pub fn default_config() -> Self {
        ExecutionConfig {
            toolchain: Toolchain::default(),
            limits: ExecutionLimits::default(),
            scoring: ScoringOptions::default(),
            debug: DebugOptions::default(),
            remote: RemoteOptions::default(),
            workspace_root: default_workspace_root(),
        }
    }

    /// Loads a config from a JSON file. Missing fields fall back to their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {:?}: {}", path, e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Invalid JSON in config file {:?}: {}", path, e))
    }

    /// Builds a config from `.env` and `GRADER_*` environment variables.
    ///
    /// `GRADER_CONFIG` may point to a JSON file used as the base; individual
    /// variables then override single fields.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        let base = env::var("GRADER_CONFIG").ok().filter(|p| !p.is_empty());
        Self::load(base.as_deref())
    }

    /// Like [`from_env`](Self::from_env), with an explicit base file.
    pub fn load(base_file: Option<&str>) -> Result<Self, String> {
        let mut cfg = match base_file {
            Some(path) => {
                tracing::debug!(path = %path, "Loading grading configuration file");
                Self::from_json_file(path)?
            }
            None => Self::default_config(),
        };

        override_from_env("GRADER_JAVAC", &mut cfg.toolchain.javac)?;
        override_from_env("GRADER_JAVA", &mut cfg.toolchain.java)?;
        override_from_env("GRADER_JUNIT_JAR", &mut cfg.toolchain.junit_jar)?;
        override_from_env("GRADER_HAMCREST_JAR", &mut cfg.toolchain.hamcrest_jar)?;
        override_from_env("GRADER_POLICY_FILE", &mut cfg.toolchain.policy_file)?;
        override_from_env("GRADER_CHECKSTYLE", &mut cfg.toolchain.checkstyle)?;
        override_from_env("GRADER_CHECKSTYLE_CONFIG", &mut cfg.toolchain.checkstyle_config)?;
        override_from_env("GRADER_PRECOMMAND", &mut cfg.toolchain.precommand)?;
        override_from_env("GRADER_TIMEOUT_SECS", &mut cfg.limits.timeout_secs)?;
        override_from_env("GRADER_MEMORY_XMX_MB", &mut cfg.limits.memory_xmx_mb)?;
        override_from_env("GRADER_OUTPUT_LIMIT_KB", &mut cfg.limits.output_limit_kb)?;
        override_from_env("GRADER_MAX_AUDIT_FINDINGS", &mut cfg.scoring.max_audit_findings)?;
        override_from_env("GRADER_AUDIT_WEIGHT", &mut cfg.scoring.default_audit_weight)?;
        override_from_env("GRADER_DEBUG_LOGFILE", &mut cfg.debug.logfile)?;
        override_from_env("GRADER_DEBUG_NOCLEANUP", &mut cfg.debug.nocleanup)?;
        override_from_env("GRADER_REMOTE_SERVER", &mut cfg.remote.server)?;
        override_from_env("GRADER_REMOTE_USER", &mut cfg.remote.user)?;
        override_from_env("GRADER_REMOTE_PASSWORD", &mut cfg.remote.password)?;
        override_from_env("GRADER_WORKSPACE_ROOT", &mut cfg.workspace_root)?;

        Ok(cfg)
    }

    /// True when grading is delegated to a remote service.
    pub fn is_remote(&self) -> bool {
        !self.remote.server.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.limits.timeout_secs)
    }

    pub fn output_limit_bytes(&self) -> usize {
        (self.limits.output_limit_kb as usize).saturating_mul(1024)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.limits.poll_interval_ms)
    }
}

fn override_from_env<T: FromStr>(key: &str, field: &mut T) -> Result<(), String> {
    if let Ok(raw) = env::var(key) {
        *field = raw
            .parse()
            .map_err(|_| format!("Invalid value for {}: {:?}", key, raw))?;
    }
    Ok(())
}

//Default Functions

fn default_javac() -> String {
    "javac".to_string()
}

fn default_java() -> String {
    "java".to_string()
}

fn default_junit_jar() -> String {
    "/usr/share/java/junit4.jar".to_string()
}

fn default_hamcrest_jar() -> String {
    "/usr/share/java/hamcrest-core.jar".to_string()
}

fn default_policy_file() -> String {
    "/etc/javaunittest/polfile".to_string()
}

fn default_checkstyle() -> String {
    "checkstyle".to_string()
}

fn default_checkstyle_config() -> String {
    "/etc/javaunittest/checks.xml".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_memory_xmx_mb() -> u64 {
    64
}

fn default_output_limit_kb() -> u64 {
    2048
}

fn default_poll_interval_ms() -> u64 {
    800
}

fn default_max_audit_findings() -> u32 {
    6
}

fn default_audit_weight() -> f64 {
    0.1
}

fn default_client_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_workspace_root() -> PathBuf {
    env::temp_dir().join("javaunittest")
}
