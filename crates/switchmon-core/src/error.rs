// ── Core error types ──
//
// Domain errors from switchmon-core. Consumers never see HTTP status codes
// or envelope codes directly; the `From<switchmon_api::Error>` impl
// translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the SwitchBot API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to the SwitchBot API timed out")]
    Timeout,

    #[error("SwitchBot API request quota exhausted")]
    RateLimited,

    #[error("Operation cancelled")]
    Cancelled,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Device {identifier} is offline: {message}")]
    DeviceOffline { identifier: String, message: String },

    #[error("Status of device {identifier} has no {field} reading")]
    IncompleteReading {
        identifier: String,
        field: &'static str,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Envelope status code, when the API returned one.
        code: Option<i64>,
        /// HTTP status code, when applicable.
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Attach a device identifier to errors that are about one device.
    pub(crate) fn for_device(err: switchmon_api::Error, identifier: &str) -> Self {
        if err.is_not_found() {
            return Self::DeviceNotFound {
                identifier: identifier.to_owned(),
            };
        }
        if err.is_offline() {
            return Self::DeviceOffline {
                identifier: identifier.to_owned(),
                message: err.to_string(),
            };
        }
        err.into()
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<switchmon_api::Error> for CoreError {
    fn from(err: switchmon_api::Error) -> Self {
        if err.is_timeout() {
            return CoreError::Timeout;
        }
        match err {
            switchmon_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            switchmon_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            switchmon_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            switchmon_api::Error::Http { status, body } => CoreError::Api {
                message: format!("HTTP {status}: {body}"),
                code: None,
                status: Some(status),
            },
            switchmon_api::Error::RateLimited => CoreError::RateLimited,
            switchmon_api::Error::Api {
                status_code,
                message,
            } => CoreError::Api {
                message,
                code: Some(status_code),
                status: None,
            },
            switchmon_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
