// switchmon-api: Async Rust client for the SwitchBot cloud API (v1.1)

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{Credentials, RequestSigner};
pub use client::SwitchBotClient;
pub use error::Error;
pub use models::{DeviceList, DeviceStatus, InfraredRemote, PhysicalDevice};
pub use transport::TransportConfig;
