//! Volume metadata probing (diskutil).

use crate::HalResult;
use std::path::Path;

/// Disk information trait.
pub trait DiskInfoOps {
    /// Return the raw property-list document describing the volume mounted at `volume`.
    ///
    /// A non-zero exit of the underlying utility is reported as `HalError::CommandFailed`.
    fn disk_info_plist(&self, volume: &Path) -> HalResult<Vec<u8>>;
}
