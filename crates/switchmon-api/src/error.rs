use thiserror::Error;

/// Envelope status code for a successful call.
pub const STATUS_SUCCESS: i64 = 100;
/// Envelope status code: no device with the given id.
pub const STATUS_DEVICE_NOT_FOUND: i64 = 152;
/// Envelope status code: device is offline.
pub const STATUS_DEVICE_OFFLINE: i64 = 161;
/// Envelope status code: the hub the device is paired with is offline.
pub const STATUS_HUB_OFFLINE: i64 = 171;

/// Top-level error type for the `switchmon-api` crate.
///
/// Covers every failure mode of the cloud API: signing, transport,
/// HTTP-level rejections, and the `{statusCode, message, body}` envelope.
/// `switchmon-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The token/secret pair was rejected, or could not be encoded.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success HTTP status outside the cases handled explicitly.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Daily request quota exhausted.
    #[error("Rate limited by the SwitchBot API")]
    RateLimited,

    // ── API envelope ────────────────────────────────────────────────
    /// The envelope carried a status code other than 100.
    #[error("SwitchBot API error (status {status_code}): {message}")]
    Api { status_code: i64, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the device (or resource) does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status_code, .. } => *status_code == STATUS_DEVICE_NOT_FOUND,
            Self::Http { status, .. } => *status == 404,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if the device or its hub is unreachable.
    pub fn is_offline(&self) -> bool {
        matches!(
            self,
            Self::Api {
                status_code: STATUS_DEVICE_OFFLINE | STATUS_HUB_OFFLINE,
                ..
            }
        )
    }

    /// Returns `true` if the underlying HTTP request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
