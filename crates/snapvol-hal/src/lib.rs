//! snapvol Host Abstraction Layer (HAL).
//!
//! Everything that touches the running system (spawning `diskutil`, `tmutil`, `mount`,
//! reading the effective uid, probing paths) goes through the traits in [`hal`], so the
//! volume logic above it can be exercised against [`FakeHal`].

pub mod diskutil;
pub mod error;
pub mod hal;
pub mod path;
pub mod tmutil;

pub use diskutil::{normalize_device_identifier, VolumeInfo};
pub use error::{HalError, HalResult};
pub use hal::*;
pub use path::device_path;
