//! Settings for the switchmon exporter.
//!
//! Layered loading (defaults, TOML file, `SWITCHMON_*` env), credentials
//! read verbatim from `SWITCHBOT_TOKEN` / `SWITCHBOT_SECRET`, optional `.env`
//! support, and translation to `switchmon_core::ControllerConfig`.

use std::env::VarError;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use switchmon_core::{ControllerConfig, Credentials, DeviceType, ExpositionOptions};

/// Environment variable holding the open token.
pub const TOKEN_ENV: &str = "SWITCHBOT_TOKEN";
/// Environment variable holding the secret key.
pub const SECRET_ENV: &str = "SWITCHBOT_SECRET";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("{var} is not set")]
    MissingCredential { var: &'static str },

    #[error("config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    /// Missing or empty credentials.
    pub fn is_credentials(&self) -> bool {
        matches!(self, Self::MissingCredential { .. })
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Everything configurable except the credentials.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Background directory refresh period. 0 = refresh on demand only.
    #[serde(default)]
    pub refresh_interval_secs: u64,

    /// Device type tags queried for temperature and humidity.
    #[serde(default = "default_sensor_types")]
    pub sensor_types: Vec<String>,

    // Tables last so TOML output stays valid.
    #[serde(default)]
    pub listen: ListenSettings,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub metrics: MetricsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 0,
            sensor_types: default_sensor_types(),
            listen: ListenSettings::default(),
            api: ApiSettings::default(),
            metrics: MetricsSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListenSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_api_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetricsSettings {
    /// Prefix for every exported metric name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default = "default_scrape_timeout")]
    pub scrape_timeout_secs: u64,

    /// Attach observation timestamps to exported samples.
    #[serde(default)]
    pub timestamps: bool,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            namespace: None,
            scrape_timeout_secs: default_scrape_timeout(),
            timestamps: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8888
}
fn default_base_url() -> String {
    switchmon_core::api::DEFAULT_BASE_URL.into()
}
fn default_api_timeout() -> u64 {
    10
}
fn default_scrape_timeout() -> u64 {
    20
}
fn default_sensor_types() -> Vec<String> {
    DeviceType::default_sensor_types()
        .into_iter()
        .map(String::from)
        .collect()
}

impl Settings {
    /// Render as TOML (credentials are never part of `Settings`).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn exposition_options(&self) -> ExpositionOptions {
        ExpositionOptions {
            namespace: self.metrics.namespace.clone().filter(|ns| !ns.is_empty()),
            timestamps: self.metrics.timestamps,
        }
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_secs == 0 {
            return Err(validation("api.timeout_secs", "must be greater than 0"));
        }
        if self.metrics.scrape_timeout_secs == 0 {
            return Err(validation("metrics.scrape_timeout_secs", "must be greater than 0"));
        }
        if self.sensor_types.is_empty() {
            return Err(validation("sensor_types", "at least one device type is required"));
        }
        if self.listen.host.trim().is_empty() {
            return Err(validation("listen.host", "must not be empty"));
        }
        self.api_url().map(|_| ())
    }

    pub fn api_url(&self) -> Result<url::Url, ConfigError> {
        self.api
            .base_url
            .parse()
            .map_err(|e| validation("api.base_url", &format!("invalid URL {:?}: {e}", self.api.base_url)))
    }

    /// Build the controller configuration for these settings.
    pub fn to_controller_config(
        &self,
        credentials: Credentials,
    ) -> Result<ControllerConfig, ConfigError> {
        self.validate()?;
        let mut config = ControllerConfig::new(self.api_url()?, credentials);
        config.timeout = Duration::from_secs(self.api.timeout_secs);
        config.scrape_timeout = Duration::from_secs(self.metrics.scrape_timeout_secs);
        config.refresh_interval_secs = self.refresh_interval_secs;
        config.sensor_types = self
            .sensor_types
            .iter()
            .map(|t| DeviceType::from(t.as_str()))
            .collect();
        Ok(config)
    }
}

fn validation(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config file location (`~/.config/switchmon/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "switchmon", "switchmon").map_or_else(
        || PathBuf::from("switchmon.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load `.env` from the working directory into the process environment.
///
/// Returns the file path when one was loaded. A missing file is not an
/// error; existing variables are never overridden.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The layered provider chain.
///
/// An explicit `config_file` must exist; the platform default may not.
pub fn figment(config_file: Option<&Path>) -> Result<Figment, ConfigError> {
    let path = match config_file {
        Some(path) if !path.exists() => {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Some(path) => path.to_path_buf(),
        None => config_path(),
    };
    debug!(path = %path.display(), "config file");

    Ok(Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SWITCHMON_").split("__")))
}

/// Read the token and secret from the process environment, rejecting
/// empty values.
///
/// Values are taken verbatim: a provider would parse `1234` as an integer.
/// Errors name the variable, never its value.
pub fn resolve_credentials() -> Result<Credentials, ConfigError> {
    let token = read_credential(TOKEN_ENV)?;
    let secret = read_credential(SECRET_ENV)?;
    Ok(Credentials { token, secret })
}

fn read_credential(var: &'static str) -> Result<SecretString, ConfigError> {
    let value = match std::env::var(var) {
        Ok(value) => value,
        Err(VarError::NotPresent) => String::new(),
        Err(VarError::NotUnicode(_)) => {
            return Err(ConfigError::Validation {
                field: var.into(),
                reason: "not valid UTF-8".into(),
            });
        }
    };
    let secret = SecretString::from(value);
    if secret.expose_secret().trim().is_empty() {
        return Err(ConfigError::MissingCredential { var });
    }
    Ok(secret)
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub credentials: Credentials,
}

impl Config {
    pub fn to_controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        self.settings.to_controller_config(self.credentials.clone())
    }
}

/// Load settings only. Credentials are not required.
pub fn load_settings(config_file: Option<&Path>) -> Result<Settings, ConfigError> {
    let settings: Settings = figment(config_file)?.extract()?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings and credentials. Missing credentials are an error.
pub fn load(config_file: Option<&Path>) -> Result<Config, ConfigError> {
    let figment = figment(config_file)?;
    let credentials = resolve_credentials()?;
    let settings: Settings = figment.extract()?;
    settings.validate()?;
    Ok(Config {
        settings,
        credentials,
    })
}
