//! Runtime configuration.
//!
//! Every field has a default matching a stock macOS install, so a config file is only
//! needed to point at different tools or mount locations.

use crate::errors::{Result, SnapvolError};
use serde::Deserialize;
use snapvol_hal::ToolPaths;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "SNAPVOL_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub diskutil: String,
    pub tmutil: String,
    pub mount: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            diskutil: "diskutil".to_string(),
            tmutil: "tmutil".to_string(),
            mount: "mount".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapvolConfig {
    /// Where the writable root volume is mounted.
    pub mount_location: PathBuf,
    /// Relative path that only exists once the real system tree is exposed.
    pub marker_subpath: PathBuf,
    pub device_prefix: String,
    pub device_dir: PathBuf,
    pub filesystem_type: String,
    pub mount_options: String,
    pub escalation_helper: String,
    pub tools: ToolsConfig,
}

impl Default for SnapvolConfig {
    fn default() -> Self {
        Self {
            mount_location: PathBuf::from("/System/Volumes/Update/mnt1"),
            marker_subpath: PathBuf::from("System/Library/Extensions"),
            device_prefix: snapvol_hal::diskutil::DEVICE_PREFIX.to_string(),
            device_dir: PathBuf::from("/dev"),
            filesystem_type: "apfs".to_string(),
            mount_options: "nobrowse".to_string(),
            escalation_helper: "sudo".to_string(),
            tools: ToolsConfig::default(),
        }
    }
}

impl SnapvolConfig {
    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|e| {
            SnapvolError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            SnapvolError::Config(format!("failed to parse {}: {e}", path.display()))
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.mount_location.join(&self.marker_subpath)
    }

    pub fn tool_paths(&self) -> ToolPaths {
        ToolPaths {
            diskutil: self.tools.diskutil.clone(),
            tmutil: self.tools.tmutil.clone(),
        }
    }
}

/// Pick the config file: explicit flag first, then `SNAPVOL_CONFIG`.
pub fn resolve_path(flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(CONFIG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}
