use std::path::{Path, PathBuf};

/// Device node path for a block-device identifier (`disk3s1` -> `/dev/disk3s1`).
pub fn device_path(device_dir: &Path, identifier: &str) -> PathBuf {
    device_dir.join(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_identifier_under_device_dir() {
        assert_eq!(
            device_path(Path::new("/dev"), "disk3s1"),
            PathBuf::from("/dev/disk3s1")
        );
    }
}
