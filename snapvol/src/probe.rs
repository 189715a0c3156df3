//! Volume metadata queries.

use crate::errors::Result;
use snapvol_hal::{DiskInfoOps, VolumeInfo};
use std::path::Path;

/// Queries `diskutil` for a mounted volume. Nothing is cached between calls.
pub struct VolumeInfoProbe<'a, H: ?Sized> {
    hal: &'a H,
}

impl<'a, H: DiskInfoOps + ?Sized> VolumeInfoProbe<'a, H> {
    pub fn new(hal: &'a H) -> Self {
        Self { hal }
    }

    pub fn info(&self, path: &Path) -> Result<VolumeInfo> {
        let payload = self.hal.disk_info_plist(path)?;
        let info = VolumeInfo::from_plist(&payload)?;
        log::debug!(
            "{}: device={} (reported {}), snapshot={}",
            path.display(),
            info.device_identifier,
            info.raw_identifier,
            info.is_snapshot_backed
        );
        Ok(info)
    }
}
