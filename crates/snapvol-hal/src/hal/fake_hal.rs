//! Fake HAL implementation for testing.
//!
//! This implementation records all operations without executing them,
//! allowing for CI-safe testing without root privileges, macOS, or real volumes.

use super::{
    CommandOutput, DiskInfoOps, MountOps, PrivilegeOps, ProcessOps, SnapshotOps, StreamMode,
};
use crate::{HalError, HalResult};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    PrivilegeQuery,
    Command {
        argv: Vec<String>,
        streams: StreamMode,
    },
    DiskInfo {
        volume: PathBuf,
    },
    ListSnapshots {
        volume: PathBuf,
    },
    CreateSnapshot {
        volume: PathBuf,
    },
    DeleteSnapshot {
        id: String,
    },
}

#[derive(Debug, Clone)]
enum DiskInfoReply {
    Plist(Vec<u8>),
    Fail { code: i32, stderr: String },
}

/// Shared state for FakeHal operations.
#[derive(Debug, Default)]
struct FakeHalState {
    /// All operations that were recorded
    operations: Vec<Operation>,
    elevated: bool,
    disk_info: HashMap<PathBuf, DiskInfoReply>,
    /// Paths that currently "exist"
    existing_paths: HashSet<PathBuf>,
    /// Scripted replies for `run_command`, consumed in order
    command_replies: VecDeque<CommandOutput>,
    /// Paths that appear once a command exits 0
    revealed_on_success: Vec<PathBuf>,
    snapshots: BTreeMap<PathBuf, Vec<String>>,
    snapshot_seq: u32,
    snapshot_failure: Option<String>,
}

/// Fake HAL implementation that records operations without executing them.
///
/// This is designed for testing and CI environments where real system
/// operations would fail or be dangerous.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeHalState> {
        // A panic inside another test thread must not hide this test's recording.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state().operations.clone()
    }

    /// Get the number of operations recorded.
    pub fn operation_count(&self) -> usize {
        self.state().operations.len()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state().operations.iter().any(check)
    }

    /// Command lines passed to `run_command`, in order.
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.state()
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::Command { argv, .. } => Some(argv.clone()),
                _ => None,
            })
            .collect()
    }

    /// Clear all recorded operations.
    pub fn clear(&self) {
        self.state().operations.clear();
    }

    pub fn set_elevated(&self, elevated: bool) {
        self.state().elevated = elevated;
    }

    /// Script a `diskutil info -plist` answer for `volume`.
    ///
    /// `snapshot` of `None` omits the `APFSSnapshot` key entirely.
    pub fn set_disk_info(&self, volume: impl Into<PathBuf>, identifier: &str, snapshot: Option<bool>) {
        let mut entries = format!("<key>DeviceIdentifier</key><string>{identifier}</string>");
        if let Some(flag) = snapshot {
            entries.push_str(&format!(
                "<key>APFSSnapshot</key><{}/>",
                if flag { "true" } else { "false" }
            ));
        }
        let doc = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <plist version=\"1.0\"><dict>{entries}</dict></plist>\n"
        );
        self.set_disk_info_raw(volume, doc.into_bytes());
    }

    /// Script a raw disk-info payload (possibly malformed).
    pub fn set_disk_info_raw(&self, volume: impl Into<PathBuf>, payload: Vec<u8>) {
        self.state()
            .disk_info
            .insert(volume.into(), DiskInfoReply::Plist(payload));
    }

    /// Make the disk-info query for `volume` exit non-zero.
    pub fn fail_disk_info(&self, volume: impl Into<PathBuf>, code: i32, stderr: &str) {
        self.state().disk_info.insert(
            volume.into(),
            DiskInfoReply::Fail {
                code,
                stderr: stderr.to_string(),
            },
        );
    }

    pub fn add_path(&self, path: impl Into<PathBuf>) {
        self.state().existing_paths.insert(path.into());
    }

    pub fn remove_path(&self, path: &Path) {
        self.state().existing_paths.remove(path);
    }

    /// Queue the reply for the next `run_command`. Unscripted commands exit 0 silently.
    pub fn push_command_reply(&self, reply: CommandOutput) {
        self.state().command_replies.push_back(reply);
    }

    /// Make `path` appear after the next successful command (e.g. a mount exposing a tree).
    pub fn reveal_on_success(&self, path: impl Into<PathBuf>) {
        self.state().revealed_on_success.push(path.into());
    }

    pub fn seed_snapshot(&self, volume: impl Into<PathBuf>, id: &str) {
        self.state()
            .snapshots
            .entry(volume.into())
            .or_default()
            .push(id.to_string());
    }

    /// Make every snapshot operation fail with `stderr`.
    pub fn fail_snapshots(&self, stderr: &str) {
        self.state().snapshot_failure = Some(stderr.to_string());
    }

    fn record_operation(&self, op: Operation) {
        self.state().operations.push(op);
    }

    fn snapshot_gate(&self) -> HalResult<()> {
        match &self.state().snapshot_failure {
            Some(stderr) => Err(HalError::CommandFailed {
                program: "tmutil".to_string(),
                code: Some(1),
                stderr: stderr.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl ProcessOps for FakeHal {
    fn run_command(&self, argv: &[String], streams: StreamMode) -> HalResult<CommandOutput> {
        if argv.is_empty() {
            return Err(HalError::EmptyCommand);
        }
        log::info!("FAKE HAL: exec {}", argv.join(" "));
        self.record_operation(Operation::Command {
            argv: argv.to_vec(),
            streams,
        });

        let mut state = self.state();
        let reply = state.command_replies.pop_front().unwrap_or(CommandOutput {
            code: Some(0),
            ..CommandOutput::default()
        });
        if reply.success() {
            let revealed = std::mem::take(&mut state.revealed_on_success);
            state.existing_paths.extend(revealed);
        }
        Ok(reply)
    }
}

impl PrivilegeOps for FakeHal {
    fn is_elevated(&self) -> bool {
        self.record_operation(Operation::PrivilegeQuery);
        self.state().elevated
    }
}

impl DiskInfoOps for FakeHal {
    fn disk_info_plist(&self, volume: &Path) -> HalResult<Vec<u8>> {
        self.record_operation(Operation::DiskInfo {
            volume: volume.to_path_buf(),
        });
        match self.state().disk_info.get(volume).cloned() {
            Some(DiskInfoReply::Plist(bytes)) => Ok(bytes),
            Some(DiskInfoReply::Fail { code, stderr }) => Err(HalError::CommandFailed {
                program: "diskutil".to_string(),
                code: Some(code),
                stderr,
            }),
            None => Err(HalError::CommandFailed {
                program: "diskutil".to_string(),
                code: Some(1),
                stderr: format!("Could not find disk: {}", volume.display()),
            }),
        }
    }
}

impl SnapshotOps for FakeHal {
    fn list_local_snapshots(&self, volume: &Path) -> HalResult<String> {
        self.record_operation(Operation::ListSnapshots {
            volume: volume.to_path_buf(),
        });
        self.snapshot_gate()?;
        let state = self.state();
        let mut out = format!("Snapshots for disk {}:\n", volume.display());
        for id in state.snapshots.get(volume).into_iter().flatten() {
            out.push_str(id);
            out.push('\n');
        }
        Ok(out)
    }

    fn create_local_snapshot(&self, volume: &Path) -> HalResult<String> {
        self.record_operation(Operation::CreateSnapshot {
            volume: volume.to_path_buf(),
        });
        self.snapshot_gate()?;
        let mut state = self.state();
        state.snapshot_seq += 1;
        let date = format!("2026-10-19-{:06}", state.snapshot_seq);
        state
            .snapshots
            .entry(volume.to_path_buf())
            .or_default()
            .push(format!("com.apple.TimeMachine.{date}.local"));
        Ok(format!("Created local snapshot with date: {date}\n"))
    }

    fn delete_local_snapshot(&self, id: &str) -> HalResult<()> {
        self.record_operation(Operation::DeleteSnapshot { id: id.to_string() });
        self.snapshot_gate()?;
        let mut state = self.state();
        let mut found = false;
        for ids in state.snapshots.values_mut() {
            let before = ids.len();
            ids.retain(|existing| existing != id && !existing.contains(&format!(".{id}.")));
            found |= ids.len() != before;
        }
        if !found {
            return Err(HalError::CommandFailed {
                program: "tmutil".to_string(),
                code: Some(1),
                stderr: format!("No such snapshot: {id}"),
            });
        }
        Ok(())
    }
}

impl MountOps for FakeHal {
    fn path_exists(&self, path: &Path) -> HalResult<bool> {
        let exists = self.state().existing_paths.contains(path);
        log::info!("FAKE HAL: path_exists({}) = {}", path.display(), exists);
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VolumeInfo;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fake_hal_records_commands() {
        let hal = FakeHal::new();
        let out = hal
            .run_command(&argv(&["mount", "-t", "apfs"]), StreamMode::Merged)
            .unwrap();

        assert!(out.success());
        assert_eq!(hal.operation_count(), 1);
        assert_eq!(hal.commands(), vec![argv(&["mount", "-t", "apfs"])]);
    }

    #[test]
    fn scripted_reply_is_consumed_once() {
        let hal = FakeHal::new();
        hal.push_command_reply(CommandOutput {
            code: Some(75),
            stdout: "mount_apfs: Resource busy".into(),
            stderr: String::new(),
        });
        let first = hal.run_command(&argv(&["mount"]), StreamMode::Merged).unwrap();
        let second = hal.run_command(&argv(&["mount"]), StreamMode::Merged).unwrap();
        assert_eq!(first.code, Some(75));
        assert!(second.success());
    }

    #[test]
    fn reveal_happens_only_after_success() {
        let hal = FakeHal::new();
        let marker = Path::new("/mnt1/System/Library/Extensions");
        hal.reveal_on_success(marker);
        hal.push_command_reply(CommandOutput {
            code: Some(1),
            ..CommandOutput::default()
        });

        hal.run_command(&argv(&["mount"]), StreamMode::Merged).unwrap();
        assert!(!hal.path_exists(marker).unwrap());

        hal.run_command(&argv(&["mount"]), StreamMode::Merged).unwrap();
        assert!(hal.path_exists(marker).unwrap());
    }

    #[test]
    fn disk_info_round_trips_through_parser() {
        let hal = FakeHal::new();
        hal.set_disk_info("/", "disk3s1s1", Some(true));
        let info = VolumeInfo::from_plist(&hal.disk_info_plist(Path::new("/")).unwrap()).unwrap();
        assert_eq!(info.device_identifier, "disk3s1");
        assert!(info.is_snapshot_backed);

        hal.set_disk_info("/Volumes/Data", "disk3s5", None);
        let info =
            VolumeInfo::from_plist(&hal.disk_info_plist(Path::new("/Volumes/Data")).unwrap())
                .unwrap();
        assert!(!info.is_snapshot_backed);
    }

    #[test]
    fn unknown_volume_fails_like_diskutil() {
        let hal = FakeHal::new();
        let err = hal.disk_info_plist(Path::new("/nope")).unwrap_err();
        assert!(matches!(err, HalError::CommandFailed { code: Some(1), .. }));
    }

    #[test]
    fn snapshots_create_list_delete() {
        let hal = FakeHal::new();
        let vol = Path::new("/");
        let report = hal.create_local_snapshot(vol).unwrap();
        assert!(report.contains("2026-10-19-000001"));

        let listing = hal.list_local_snapshots(vol).unwrap();
        assert!(listing.contains("com.apple.TimeMachine.2026-10-19-000001.local"));

        hal.delete_local_snapshot("2026-10-19-000001").unwrap();
        assert!(hal.delete_local_snapshot("2026-10-19-000001").is_err());
    }

    #[test]
    fn privilege_queries_are_recorded() {
        let hal = FakeHal::new();
        assert!(!hal.is_elevated());
        hal.set_elevated(true);
        assert!(hal.is_elevated());
        assert_eq!(
            hal.operations(),
            vec![Operation::PrivilegeQuery, Operation::PrivilegeQuery]
        );
    }

    #[test]
    fn fake_hal_can_clear() {
        let hal = FakeHal::new();
        hal.run_command(&argv(&["true"]), StreamMode::Separate).unwrap();
        assert_eq!(hal.operation_count(), 1);
        hal.clear();
        assert_eq!(hal.operation_count(), 0);
    }
}
