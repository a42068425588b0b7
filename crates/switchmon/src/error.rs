//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text
//! and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use switchmon_config::ConfigError;
use switchmon_core::CoreError;
use switchmon_core::metrics::MetricsError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("{var} is not set")]
    #[diagnostic(
        code(switchmon::no_credentials),
        help(
            "Set SWITCHBOT_TOKEN and SWITCHBOT_SECRET in the environment or in a .env file.\n\
             Both values are shown in the SwitchBot app under Profile > Preferences > Developer Options."
        )
    )]
    MissingCredential { var: &'static str },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(switchmon::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration error")]
    #[diagnostic(
        code(switchmon::config),
        help("Check the config file and SWITCHMON_* environment variables.")
    )]
    Config(#[source] ConfigError),

    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the SwitchBot API at {url}")]
    #[diagnostic(
        code(switchmon::connection_failed),
        help("Check network access to the API and the api.base_url setting.")
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed")]
    #[diagnostic(
        code(switchmon::auth_failed),
        help("Verify SWITCHBOT_TOKEN and SWITCHBOT_SECRET. The token is regenerated when the app resets it.")
    )]
    AuthFailed { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(switchmon::timeout),
        help("Increase api.timeout_secs or check API responsiveness.")
    )]
    Timeout,

    #[error("Failed to listen on {addr}")]
    #[diagnostic(code(switchmon::bind))]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error: {message}")]
    #[diagnostic(code(switchmon::api_error))]
    Api { message: String },

    #[error("Failed to register metrics: {0}")]
    #[diagnostic(code(switchmon::metrics))]
    Metrics(#[from] MetricsError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    #[diagnostic(code(switchmon::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingCredential { .. }
            | Self::Validation { .. }
            | Self::Config(_)
            | Self::AuthFailed { .. } => exit_code::CONFIG,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingCredential { var } => CliError::MissingCredential { var },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Config { message } => CliError::Validation {
                field: "api".into(),
                reason: message,
            },
            other => CliError::Api {
                message: other.to_string(),
            },
        }
    }
}
