//! Mount command composition and mount-state probing.

use crate::HalResult;
use std::path::{Path, PathBuf};

/// Trait for observing mount state through the filesystem.
pub trait MountOps {
    /// Check whether `path` currently exists.
    ///
    /// Always re-reads the filesystem; the answer is never cached.
    fn path_exists(&self, path: &Path) -> HalResult<bool>;
}

/// Mount options and flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountOptions {
    /// Additional mount options as a comma-separated string (e.g., "nobrowse,rdonly")
    pub options: Option<String>,
}

impl MountOptions {
    pub fn with_options(options: impl Into<String>) -> Self {
        let options = options.into();
        Self {
            options: (!options.is_empty()).then_some(options),
        }
    }
}

/// A fully-specified mount invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRequest {
    /// Filesystem driver (e.g., `"apfs"`)
    pub fstype: String,
    pub options: MountOptions,
    /// Block device path (e.g., `/dev/disk3s1`)
    pub source: PathBuf,
    /// Mount point path
    pub target: PathBuf,
}

impl MountRequest {
    /// Command vector for the mount utility `program`:
    /// `program [-o <options>] -t <fstype> <source> <target>`.
    pub fn to_argv(&self, program: &str) -> Vec<String> {
        let mut argv = vec![program.to_string()];
        if let Some(opts) = &self.options.options {
            argv.push("-o".to_string());
            argv.push(opts.clone());
        }
        argv.push("-t".to_string());
        argv.push(self.fstype.clone());
        argv.push(self.source.display().to_string());
        argv.push(self.target.display().to_string());
        argv
    }
}
