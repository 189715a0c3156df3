//! macOS HAL implementation using the real system utilities.

use super::{
    CommandOutput, DiskInfoOps, MountOps, PrivilegeOps, ProcessOps, SnapshotOps, StreamMode,
};
use crate::{HalError, HalResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Names (or absolute paths) of the external utilities the HAL drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub diskutil: String,
    pub tmutil: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            diskutil: "diskutil".to_string(),
            tmutil: "tmutil".to_string(),
        }
    }
}

/// Real HAL implementation for macOS systems.
///
/// Every call blocks until the child exits; no timeout is applied.
#[derive(Debug, Clone, Default)]
pub struct MacHal {
    tools: ToolPaths,
}

impl MacHal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools(tools: ToolPaths) -> Self {
        Self { tools }
    }
}

fn map_command_err(program: &str, err: std::io::Error) -> HalError {
    if err.kind() == std::io::ErrorKind::NotFound {
        return HalError::CommandNotFound(program.to_string());
    }
    HalError::Io(err)
}

fn output_failed(program: &str, output: &Output) -> HalError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let stderr = if stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr
    };
    HalError::CommandFailed {
        program: program.to_string(),
        code: output.status.code(),
        stderr,
    }
}

fn checked_output(program: &str, args: &[&str]) -> HalResult<Output> {
    log::debug!("exec: {} {}", program, args.join(" "));
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| map_command_err(program, e))?;
    if !output.status.success() {
        return Err(output_failed(program, &output));
    }
    Ok(output)
}

fn run_separate(mut command: Command, program: &str) -> HalResult<CommandOutput> {
    let output = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| map_command_err(program, e))?;
    Ok(CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Both streams write into one pipe, so the text keeps the order it was emitted in.
fn run_merged(mut command: Command, program: &str) -> HalResult<CommandOutput> {
    let (reader, writer) = nix::unistd::pipe().map_err(std::io::Error::from)?;
    command
        .stdout(Stdio::from(writer.try_clone()?))
        .stderr(Stdio::from(writer));
    let spawned = command.spawn();
    // Close the parent's write ends, otherwise the read below never sees EOF.
    drop(command);
    let mut child = spawned.map_err(|e| map_command_err(program, e))?;

    let mut combined = Vec::new();
    File::from(reader).read_to_end(&mut combined)?;
    let status = child.wait()?;

    Ok(CommandOutput {
        code: status.code(),
        stdout: String::from_utf8_lossy(&combined).into_owned(),
        stderr: String::new(),
    })
}

impl ProcessOps for MacHal {
    fn run_command(&self, argv: &[String], streams: StreamMode) -> HalResult<CommandOutput> {
        let (program, args) = argv.split_first().ok_or(HalError::EmptyCommand)?;
        log::debug!("exec: {}", argv.join(" "));

        let mut command = Command::new(program);
        // stdin stays attached so an escalation helper can prompt for credentials.
        command.args(args).stdin(Stdio::inherit());
        match streams {
            StreamMode::Separate => run_separate(command, program),
            StreamMode::Merged => run_merged(command, program),
        }
    }
}

impl PrivilegeOps for MacHal {
    fn is_elevated(&self) -> bool {
        nix::unistd::geteuid().is_root()
    }
}

impl DiskInfoOps for MacHal {
    fn disk_info_plist(&self, volume: &Path) -> HalResult<Vec<u8>> {
        let volume = volume.to_string_lossy();
        let output = checked_output(&self.tools.diskutil, &["info", "-plist", &volume])?;
        Ok(output.stdout)
    }
}

impl SnapshotOps for MacHal {
    fn list_local_snapshots(&self, volume: &Path) -> HalResult<String> {
        let volume = volume.to_string_lossy();
        let output = checked_output(&self.tools.tmutil, &["listlocalsnapshots", &volume])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn create_local_snapshot(&self, volume: &Path) -> HalResult<String> {
        let volume = volume.to_string_lossy();
        let output = checked_output(&self.tools.tmutil, &["localsnapshot", &volume])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn delete_local_snapshot(&self, id: &str) -> HalResult<()> {
        checked_output(&self.tools.tmutil, &["deletelocalsnapshots", id])?;
        Ok(())
    }
}

impl MountOps for MacHal {
    fn path_exists(&self, path: &Path) -> HalResult<bool> {
        Ok(path.try_exists()?)
    }
}
