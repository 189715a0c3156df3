//! Privilege-aware command runner.

use crate::errors::Result;
use snapvol_hal::{elevate_argv, CommandOutput, PrivilegeOps, ProcessOps, StreamMode};

/// Runs commands directly when the process is already elevated, otherwise through an
/// escalation helper such as `sudo`.
///
/// Privilege is read from the HAL on every call, never remembered.
pub struct PrivilegedExecutor<'a, H: ?Sized> {
    hal: &'a H,
    helper: String,
}

impl<'a, H> PrivilegedExecutor<'a, H>
where
    H: ProcessOps + PrivilegeOps + ?Sized,
{
    pub fn new(hal: &'a H, helper: impl Into<String>) -> Self {
        Self {
            hal,
            helper: helper.into(),
        }
    }

    /// The command line `run` would execute right now.
    pub fn command_line(&self, argv: &[String]) -> Vec<String> {
        elevate_argv(argv, self.hal.is_elevated(), &self.helper)
    }

    /// Execute `argv`. A non-zero exit is returned in the output, not as an error.
    pub fn run(&self, argv: &[String], streams: StreamMode) -> Result<CommandOutput> {
        let elevated = self.hal.is_elevated();
        if !elevated {
            log::debug!("not running as root; escalating with {}", self.helper);
        }
        let command = elevate_argv(argv, elevated, &self.helper);
        Ok(self.hal.run_command(&command, streams)?)
    }
}
