//! snapvol library.
//!
//! Local APFS snapshot management plus the writable root-volume mount flow. All host
//! interaction goes through `snapvol_hal`, so everything here runs against `FakeHal`
//! in tests.

pub mod actions;
pub mod cli;
pub mod config;
pub mod errors;
pub mod executor;
pub mod logging;
pub mod probe;
pub mod root_volume;
pub mod snapshots;

pub use errors::{Result, SnapvolError};
