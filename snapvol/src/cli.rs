//! CLI argument parsing for snapvol

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// List local snapshots of --volume
    List,
    /// Create a local snapshot of --volume
    Create,
    /// Delete the snapshot named by --id
    Delete,
    /// Print the block device backing the booted root volume
    GetRootVol,
    /// Mount the booted root volume writable at the update location
    MountRootVol,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::List => write!(f, "list"),
            Action::Create => write!(f, "create"),
            Action::Delete => write!(f, "delete"),
            Action::GetRootVol => write!(f, "get-root-vol"),
            Action::MountRootVol => write!(f, "mount-root-vol"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "snapvol", version)]
#[command(about = "Manage macOS snapshots.")]
pub struct Cli {
    /// Action to perform
    #[arg(value_enum)]
    pub action: Action,

    /// The volume to create a snapshot of or list snapshots for
    #[arg(long, default_value = "/")]
    pub volume: PathBuf,

    /// The ID of the snapshot to delete (required for delete action)
    #[arg(long)]
    pub id: Option<String>,

    /// Log what would be done without creating, deleting or mounting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file (TOML); defaults to $SNAPVOL_CONFIG if set
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// What to do, independent of how it was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub action: Action,
    pub volume: PathBuf,
    pub id: Option<String>,
    pub dry_run: bool,
}

impl Cli {
    pub fn request(&self) -> Request {
        Request {
            action: self.action,
            volume: self.volume.clone(),
            id: self.id.clone(),
            dry_run: self.dry_run,
        }
    }
}
