// SwitchBot API HTTP client
//
// Wraps `reqwest::Client` with URL construction, per-request signing and
// envelope unwrapping. Endpoint methods live in separate files as inherent
// impls to keep this module focused on transport mechanics.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{Credentials, RequestSigner};
use crate::error::{Error, STATUS_SUCCESS};
use crate::models::ApiResponse;
use crate::transport::TransportConfig;

/// Production endpoint of the SwitchBot cloud API.
pub const DEFAULT_BASE_URL: &str = "https://api.switch-bot.com";

/// Raw HTTP client for the SwitchBot cloud API.
///
/// Signs every request with fresh `t`/`nonce` headers and strips the
/// `{ statusCode, message, body }` envelope before the caller sees it.
#[derive(Debug, Clone)]
pub struct SwitchBotClient {
    http: reqwest::Client,
    base_url: Url,
    signer: RequestSigner,
}

impl SwitchBotClient {
    /// Create a client against the production endpoint.
    pub fn new(credentials: Credentials, transport: &TransportConfig) -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL, credentials, transport)
    }

    /// Create a client against a custom endpoint (proxies, mock servers).
    pub fn with_base_url(
        base_url: &str,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http, credentials)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        credentials: Credentials,
    ) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        // Keep a trailing slash so relative joins append rather than replace.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http,
            base_url,
            signer: RequestSigner::new(credentials),
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"v1.1/devices"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a signed GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let headers = self.signer.headers()?;
        let resp = self
            .http
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_envelope(resp).await
    }

    /// Map the HTTP status, then parse `{ statusCode, message, body }`,
    /// returning `body` on success or `Error::Api` for any other code.
    async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("request rejected with HTTP {}", status.as_u16()),
            });
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if envelope.status_code != STATUS_SUCCESS {
            return Err(Error::Api {
                status_code: envelope.status_code,
                message: envelope.message,
            });
        }

        serde_json::from_value(envelope.body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> SwitchBotClient {
        SwitchBotClient::from_reqwest(base, reqwest::Client::new(), Credentials::new("t", "s"))
            .unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let c = client("http://localhost:1234/proxy");
        assert_eq!(c.base_url().as_str(), "http://localhost:1234/proxy/");
        assert_eq!(
            c.url("v1.1/devices").unwrap().as_str(),
            "http://localhost:1234/proxy/v1.1/devices"
        );
    }

    #[test]
    fn default_base_url_joins_versioned_paths() {
        let c = client(DEFAULT_BASE_URL);
        assert_eq!(
            c.url("v1.1/devices").unwrap().as_str(),
            "https://api.switch-bot.com/v1.1/devices"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = SwitchBotClient::from_reqwest(
            "not a url",
            reqwest::Client::new(),
            Credentials::new("t", "s"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
