//! Parsing helpers for `diskutil info -plist` output.

use crate::{HalError, HalResult};
use serde::Deserialize;

/// Identifier prefix of whole-disk and slice device names (`disk3`, `disk3s1s1`).
pub const DEVICE_PREFIX: &str = "disk";

/// Slice marker inside a device identifier.
pub const SLICE_MARKER: char = 's';

#[derive(Debug, Deserialize)]
struct InfoDocument {
    #[serde(rename = "DeviceIdentifier")]
    device_identifier: String,
    // diskutil omits the key entirely for volumes that are not snapshot-backed.
    #[serde(rename = "APFSSnapshot", default)]
    apfs_snapshot: bool,
}

/// Metadata derived from one `diskutil info` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Identifier exactly as reported (e.g. `disk3s1s1`).
    pub raw_identifier: String,
    /// Identifier after [`normalize_device_identifier`] (e.g. `disk3s1`).
    pub device_identifier: String,
    pub is_snapshot_backed: bool,
}

impl VolumeInfo {
    pub fn from_plist(bytes: &[u8]) -> HalResult<Self> {
        let doc: InfoDocument = plist::from_bytes(bytes)
            .map_err(|e| HalError::Parse(format!("diskutil plist: {e}")))?;
        let raw = doc.device_identifier.trim().to_string();
        if raw.is_empty() {
            return Err(HalError::Parse("diskutil plist: empty DeviceIdentifier".into()));
        }
        Ok(Self {
            device_identifier: normalize_device_identifier(&raw).to_string(),
            raw_identifier: raw,
            is_snapshot_backed: doc.apfs_snapshot,
        })
    }
}

/// Best-effort reduction of a snapshot slice identifier to its container slice.
///
/// When the identifier contains the slice marker more than once the trailing two
/// characters are dropped (`disk3s1s1` -> `disk3s1`). Anything else is returned as is.
/// Every occurrence of the marker counts, including the one in `disk`, so a plain
/// slice such as `disk3s1` is reduced to `disk3`.
pub fn normalize_device_identifier(identifier: &str) -> &str {
    if identifier.matches(SLICE_MARKER).count() <= 1 {
        return identifier;
    }
    let cut = identifier
        .char_indices()
        .rev()
        .nth(1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &identifier[..cut]
}
