//! Local snapshot operations.
//!
//! Thin pass-through to the snapshot manager. Nothing is checked before a call and
//! nothing is remembered after it.

use crate::errors::Result;
use snapvol_hal::{tmutil, SnapshotOps};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDescriptor {
    pub id: String,
}

pub struct SnapshotService<'a, H: ?Sized> {
    hal: &'a H,
    dry_run: bool,
}

impl<'a, H: SnapshotOps + ?Sized> SnapshotService<'a, H> {
    pub fn new(hal: &'a H, dry_run: bool) -> Self {
        Self { hal, dry_run }
    }

    /// All snapshots of `volume`. An empty listing is not an error.
    pub fn list(&self, volume: &Path) -> Result<Vec<SnapshotDescriptor>> {
        let output = self.hal.list_local_snapshots(volume)?;
        Ok(tmutil::parse_snapshot_list(&output)
            .into_iter()
            .map(|id| SnapshotDescriptor { id })
            .collect())
    }

    /// Create a new snapshot of `volume`; returns the reported date stamp, if any.
    ///
    /// Calling twice creates two snapshots.
    pub fn create(&self, volume: &Path) -> Result<Option<String>> {
        if self.dry_run {
            log::info!("DRY RUN: create local snapshot of {}", volume.display());
            return Ok(None);
        }
        let output = self.hal.create_local_snapshot(volume)?;
        Ok(tmutil::parse_created_snapshot(&output))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        if self.dry_run {
            log::info!("DRY RUN: delete local snapshot {}", id);
            return Ok(());
        }
        self.hal.delete_local_snapshot(id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SnapvolError;
    use snapvol_hal::{FakeHal, Operation};

    #[test]
    fn empty_volume_lists_nothing() {
        let hal = FakeHal::new();
        let snaps = SnapshotService::new(&hal, false)
            .list(Path::new("/Volumes/Data"))
            .unwrap();
        assert!(snaps.is_empty());
    }

    #[test]
    fn create_is_not_idempotent() {
        let hal = FakeHal::new();
        let svc = SnapshotService::new(&hal, false);
        let first = svc.create(Path::new("/")).unwrap();
        let second = svc.create(Path::new("/")).unwrap();
        assert_ne!(first, second);
        assert_eq!(svc.list(Path::new("/")).unwrap().len(), 2);
    }

    #[test]
    fn delete_of_unknown_id_surfaces_tool_error() {
        let hal = FakeHal::new();
        let err = SnapshotService::new(&hal, false)
            .delete("2001-01-01-000000")
            .unwrap_err();
        assert!(matches!(err, SnapvolError::Invocation { .. }));
        assert!(err.to_string().contains("No such snapshot"));
    }

    #[test]
    fn dry_run_touches_nothing() {
        let hal = FakeHal::new();
        let svc = SnapshotService::new(&hal, true);
        assert_eq!(svc.create(Path::new("/")).unwrap(), None);
        svc.delete("2026-10-19-000001").unwrap();
        assert!(!hal.has_operation(|op| matches!(
            op,
            Operation::CreateSnapshot { .. } | Operation::DeleteSnapshot { .. }
        )));
    }
}
