// ── Device directory cache ──
//
// Snapshot storage for the most recent device listing. Refreshes swap in a
// whole new directory; readers keep whatever snapshot they already hold.

mod directory;
mod refresh;

pub use directory::{DeviceDirectory, DirectoryCache};
