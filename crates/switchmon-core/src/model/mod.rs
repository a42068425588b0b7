// ── Domain model ──
//
// Canonical representations of SwitchBot entities as the rest of the
// workspace sees them. Wire types from `switchmon-api` are converted into
// these in `convert.rs`.

pub mod device;
pub mod reading;

pub use device::{Device, DeviceId, DeviceListing, DeviceType, InfraredDevice};
pub use reading::StatusReading;
