// SwitchBot v1.1 request signing
//
// Every request carries `Authorization`, `t`, `nonce` and `sign` headers,
// where `sign = base64(HMAC-SHA256(secret, token + t + nonce))`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::Error;

type HmacSha256 = Hmac<Sha256>;

/// Open token + secret key pair issued by the SwitchBot app.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: SecretString,
    pub secret: SecretString,
}

impl Credentials {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            secret: SecretString::from(secret.into()),
        }
    }
}

/// Produces the signature header set for a single request.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Compute the `sign` value for the given timestamp and nonce.
    pub fn sign(&self, timestamp_ms: i64, nonce: &str) -> Result<String, Error> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.secret.expose_secret().as_bytes())
            .map_err(|e| Error::Authentication {
                message: format!("invalid secret key: {e}"),
            })?;
        mac.update(self.credentials.token.expose_secret().as_bytes());
        mac.update(timestamp_ms.to_string().as_bytes());
        mac.update(nonce.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Build the full header set with a fresh timestamp and nonce.
    pub fn headers(&self) -> Result<HeaderMap, Error> {
        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        let nonce = Uuid::new_v4().to_string();
        self.headers_at(timestamp_ms, &nonce)
    }

    pub(crate) fn headers_at(&self, timestamp_ms: i64, nonce: &str) -> Result<HeaderMap, Error> {
        let sign = self.sign(timestamp_ms, nonce)?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, sensitive(self.credentials.token.expose_secret())?);
        headers.insert("sign", sensitive(&sign)?);
        headers.insert("t", plain(&timestamp_ms.to_string())?);
        headers.insert("nonce", plain(nonce)?);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf8"),
        );
        Ok(headers)
    }
}

fn sensitive(value: &str) -> Result<HeaderValue, Error> {
    let mut header = plain(value)?;
    header.set_sensitive(true);
    Ok(header)
}

fn plain(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|e| Error::Authentication {
        message: format!("invalid header value: {e}"),
    })
}
