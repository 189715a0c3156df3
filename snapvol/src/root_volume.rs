//! Writable mount of the booted root volume.
//!
//! The booted system runs from a sealed, read-only APFS snapshot. Its underlying volume
//! can be mounted a second time, writable and hidden from Finder, at the auxiliary
//! location (`/System/Volumes/Update/mnt1` by default). The marker path below that
//! location is the only source of truth for whether the mount is active.

use crate::config::SnapvolConfig;
use crate::errors::{Result, SnapvolError};
use crate::executor::PrivilegedExecutor;
use crate::probe::VolumeInfoProbe;
use snapvol_hal::{
    device_path, DiskInfoOps, MountOps, MountOptions, MountRequest, PrivilegeOps, ProcessOps,
    StreamMode,
};
use std::fmt;
use std::path::Path;

pub const ROOT_VOLUME: &str = "/";

/// Progress of one mount attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    Unknown,
    Probed,
    AlreadyMounted,
    MountAttempted,
    Verified,
    Failed,
}

impl fmt::Display for MountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MountState::Unknown => "unknown",
            MountState::Probed => "probed",
            MountState::AlreadyMounted => "already-mounted",
            MountState::MountAttempted => "mount-attempted",
            MountState::Verified => "verified",
            MountState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Successful end of a mount attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    /// The marker was already present; nothing was run.
    AlreadyMounted,
    /// The mount command ran and the marker appeared.
    Verified,
    /// Dry run: the command that would have run.
    Planned(Vec<String>),
}

/// Resolve the identifier of the booted root volume (`get-root-vol`).
pub fn root_volume_identifier<H: DiskInfoOps + ?Sized>(hal: &H) -> Result<String> {
    let info = VolumeInfoProbe::new(hal).info(Path::new(ROOT_VOLUME))?;
    Ok(info.device_identifier)
}

pub struct RootVolumeMounter<'a, H: ?Sized> {
    hal: &'a H,
    config: &'a SnapvolConfig,
    dry_run: bool,
    state: MountState,
}

impl<'a, H> RootVolumeMounter<'a, H>
where
    H: ProcessOps + PrivilegeOps + DiskInfoOps + MountOps + ?Sized,
{
    pub fn new(hal: &'a H, config: &'a SnapvolConfig) -> Self {
        Self {
            hal,
            config,
            dry_run: false,
            state: MountState::Unknown,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// State reached by the most recent `mount` call.
    pub fn state(&self) -> MountState {
        self.state
    }

    /// Ensure the root volume is mounted writable at the auxiliary location.
    ///
    /// Safe to call repeatedly: an existing mount short-circuits before any privileged
    /// command. A failed verification leaves whatever the mount command did in place.
    pub fn mount(&mut self) -> Result<MountOutcome> {
        self.state = MountState::Unknown;
        let result = self.drive();
        if result.is_err() {
            self.advance(MountState::Failed);
        }
        result
    }

    fn advance(&mut self, next: MountState) {
        log::debug!("root volume mount: {} -> {}", self.state, next);
        self.state = next;
    }

    fn drive(&mut self) -> Result<MountOutcome> {
        let info = VolumeInfoProbe::new(self.hal).info(Path::new(ROOT_VOLUME))?;
        self.advance(MountState::Probed);

        let device = info.device_identifier;
        if !device.starts_with(&self.config.device_prefix) {
            return Err(SnapvolError::Precondition(format!(
                "Unexpected root volume identifier '{}' (expected a {}* device)",
                device, self.config.device_prefix
            )));
        }
        log::info!("- Found Root Volume at: {}", device);

        let marker = self.config.marker_path();
        if self.hal.path_exists(&marker)? {
            self.advance(MountState::AlreadyMounted);
            log::info!("- Root Volume is already mounted");
            return Ok(MountOutcome::AlreadyMounted);
        }

        if !info.is_snapshot_backed {
            return Err(SnapvolError::Precondition(
                "Root volume is not an APFS snapshot; writable mounting is not supported"
                    .to_string(),
            ));
        }

        let request = MountRequest {
            fstype: self.config.filesystem_type.clone(),
            options: MountOptions::with_options(self.config.mount_options.as_str()),
            source: device_path(&self.config.device_dir, &device),
            target: self.config.mount_location.clone(),
        };
        let argv = request.to_argv(&self.config.tools.mount);
        let executor = PrivilegedExecutor::new(self.hal, self.config.escalation_helper.as_str());

        if self.dry_run {
            let planned = executor.command_line(&argv);
            log::info!("DRY RUN: {}", planned.join(" "));
            return Ok(MountOutcome::Planned(planned));
        }

        log::info!("- Mounting APFS Snapshot as writable");
        self.advance(MountState::MountAttempted);
        let output = executor.run(&argv, StreamMode::Merged)?;
        if !output.success() {
            log::error!("- Unable to mount APFS Snapshot as writable");
            return Err(SnapvolError::Invocation {
                program: self.config.tools.mount.clone(),
                code: output.code,
                output: output.diagnostic(),
            });
        }
        log::info!(
            "- Mounted APFS Snapshot as writable at: {}",
            self.config.mount_location.display()
        );

        if !self.hal.path_exists(&marker)? {
            return Err(SnapvolError::Verification(format!(
                "Root Volume appears to have unmounted unexpectedly ({} is missing)",
                marker.display()
            )));
        }
        self.advance(MountState::Verified);
        log::info!("- Successfully mounted the Root Volume");
        Ok(MountOutcome::Verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapvol_hal::{CommandOutput, FakeHal, Operation};

    fn snapshot_root(hal: &FakeHal) {
        hal.set_disk_info(ROOT_VOLUME, "disk3s1s1", Some(true));
    }

    #[test]
    fn mounts_and_verifies() {
        let hal = FakeHal::new();
        let cfg = SnapvolConfig::default();
        snapshot_root(&hal);
        hal.reveal_on_success(cfg.marker_path());

        let mut mounter = RootVolumeMounter::new(&hal, &cfg);
        assert_eq!(mounter.mount().unwrap(), MountOutcome::Verified);
        assert_eq!(mounter.state(), MountState::Verified);
        assert_eq!(
            hal.commands(),
            vec![vec![
                "sudo",
                "mount",
                "-o",
                "nobrowse",
                "-t",
                "apfs",
                "/dev/disk3s1",
                "/System/Volumes/Update/mnt1"
            ]]
        );
    }

    #[test]
    fn rejected_mount_carries_tool_output() {
        let hal = FakeHal::new();
        let cfg = SnapvolConfig::default();
        snapshot_root(&hal);
        hal.push_command_reply(CommandOutput {
            code: Some(75),
            stdout: "mount_apfs: volume could not be mounted: Resource busy\n".into(),
            stderr: String::new(),
        });

        let mut mounter = RootVolumeMounter::new(&hal, &cfg);
        let err = mounter.mount().unwrap_err();
        assert_eq!(mounter.state(), MountState::Failed);
        match err {
            SnapvolError::Invocation { code, output, .. } => {
                assert_eq!(code, Some(75));
                assert_eq!(output, "mount_apfs: volume could not be mounted: Resource busy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unexpected_device_prefix_is_refused() {
        let hal = FakeHal::new();
        let cfg = SnapvolConfig::default();
        hal.set_disk_info(ROOT_VOLUME, "md0", Some(true));

        let mut mounter = RootVolumeMounter::new(&hal, &cfg);
        let err = mounter.mount().unwrap_err();
        assert!(matches!(err, SnapvolError::Precondition(_)));
        assert!(hal.commands().is_empty());
    }

    #[test]
    fn probe_failure_stops_before_anything_else() {
        let hal = FakeHal::new();
        let cfg = SnapvolConfig::default();
        hal.fail_disk_info(ROOT_VOLUME, 1, "Could not find disk: /");

        let mut mounter = RootVolumeMounter::new(&hal, &cfg);
        assert!(mounter.mount().is_err());
        assert_eq!(mounter.state(), MountState::Failed);
        assert_eq!(
            hal.operations(),
            vec![Operation::DiskInfo {
                volume: ROOT_VOLUME.into()
            }]
        );
    }

    #[test]
    fn dry_run_plans_without_running() {
        let hal = FakeHal::new();
        hal.set_elevated(true);
        let cfg = SnapvolConfig::default();
        snapshot_root(&hal);

        let mut mounter = RootVolumeMounter::new(&hal, &cfg).dry_run(true);
        let outcome = mounter.mount().unwrap();
        assert_eq!(
            outcome,
            MountOutcome::Planned(
                [
                    "mount",
                    "-o",
                    "nobrowse",
                    "-t",
                    "apfs",
                    "/dev/disk3s1",
                    "/System/Volumes/Update/mnt1"
                ]
                .iter()
                .map(|s| s.to_string())
                .collect()
            )
        );
        assert!(hal.commands().is_empty());
    }

    #[test]
    fn root_identifier_is_normalized() {
        let hal = FakeHal::new();
        snapshot_root(&hal);
        assert_eq!(root_volume_identifier(&hal).unwrap(), "disk3s1");
    }
}
