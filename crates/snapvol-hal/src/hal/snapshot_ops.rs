//! Local snapshot management (tmutil).

use crate::HalResult;
use std::path::Path;

/// Snapshot manager trait.
///
/// Each method is a single pass-through invocation; nothing is checked beforehand.
pub trait SnapshotOps {
    /// Raw listing output for `volume`.
    fn list_local_snapshots(&self, volume: &Path) -> HalResult<String>;

    /// Create a snapshot of `volume` and return the utility's report.
    fn create_local_snapshot(&self, volume: &Path) -> HalResult<String>;

    /// Delete the snapshot named `id`.
    fn delete_local_snapshot(&self, id: &str) -> HalResult<()>;
}
