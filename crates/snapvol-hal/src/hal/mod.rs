//! HAL trait definitions and implementations.
//!
//! This module defines the core traits for host operations and provides
//! both real (MacHal) and fake (FakeHal) implementations.

pub mod disk_info_ops;
pub mod fake_hal;
pub mod mac_hal;
pub mod mount_ops;
pub mod privilege_ops;
pub mod process_ops;
pub mod snapshot_ops;

pub use disk_info_ops::DiskInfoOps;
pub use fake_hal::{FakeHal, Operation};
pub use mac_hal::{MacHal, ToolPaths};
pub use mount_ops::{MountOps, MountOptions, MountRequest};
pub use privilege_ops::{elevate_argv, PrivilegeOps};
pub use process_ops::{CommandOutput, ProcessOps, StreamMode};
pub use snapshot_ops::SnapshotOps;

/// Complete HAL combining all host operation traits.
pub trait SystemHal:
    ProcessOps + PrivilegeOps + DiskInfoOps + SnapshotOps + MountOps + Send + Sync
{
}

/// Automatically implement SystemHal for any type implementing all required traits.
impl<T> SystemHal for T where
    T: ProcessOps + PrivilegeOps + DiskInfoOps + SnapshotOps + MountOps + Send + Sync
{
}
