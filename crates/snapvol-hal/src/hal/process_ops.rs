//! Process execution helpers.
//!
//! External commands are considered "world-touching" and must go through the HAL so we can
//! test workflows without spawning real processes.

use crate::HalResult;

/// How the child's standard streams are captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamMode {
    /// stdout and stderr are kept apart.
    #[default]
    Separate,
    /// stderr is folded into stdout; `CommandOutput::stderr` stays empty.
    Merged,
}

/// Captured result of an external command.
///
/// A non-zero exit is a normal value here; callers decide what it means.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Diagnostic text suitable for showing to an operator.
    pub fn diagnostic(&self) -> String {
        let out = self.stdout.trim();
        let err = self.stderr.trim();
        match (out.is_empty(), err.is_empty()) {
            (_, true) => out.to_string(),
            (true, false) => err.to_string(),
            (false, false) => format!("{out}\n{err}"),
        }
    }
}

/// Process execution trait (external command runner).
pub trait ProcessOps {
    /// Run `argv[0]` with the remaining arguments and capture its output.
    ///
    /// Only a failure to start the program is an error.
    fn run_command(&self, argv: &[String], streams: StreamMode) -> HalResult<CommandOutput>;
}
