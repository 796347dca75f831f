//! Single-file byte store
//!
//! Writes land at their final path only once complete, or not at all:
//! temp file in the target directory, full write, fsync, rename onto the
//! final name, best-effort fsync of the parent directory. Rename replaces
//! an existing file, so scalar saves overwrite by default.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{DepotError, DepotResult};

fn temp_sibling(location: &Path) -> DepotResult<PathBuf> {
    let name = location
        .file_name()
        .ok_or_else(|| DepotError::InvalidPath(location.display().to_string()))?;
    Ok(location.with_file_name(format!("{}.tmp", name.to_string_lossy())))
}

/// Write `bytes` to `location` atomically.
///
/// The caller is responsible for the parent directory existing (the
/// resolver's write path guarantees it).
pub fn write_atomic(location: &Path, bytes: &[u8]) -> DepotResult<()> {
    let temp_path = temp_sibling(location)?;

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| DepotError::io(&temp_path, e))?;

    file.write_all(bytes)
        .map_err(|e| DepotError::io(&temp_path, e))?;

    file.sync_all().map_err(|e| DepotError::io(&temp_path, e))?;

    fs::rename(&temp_path, location).map_err(|e| DepotError::io(location, e))?;

    // Make the rename itself durable; failure here does not lose data
    if let Some(parent) = location.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

/// Read the full byte payload at `location`.
pub fn read(location: &Path) -> DepotResult<Vec<u8>> {
    fs::read(location).map_err(|e| DepotError::io(location, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_read_round_trip() {
        let temp = TempDir::new().unwrap();
        let location = temp.path().join("payload.bin");

        write_atomic(&location, b"hello depot").unwrap();
        assert_eq!(read(&location).unwrap(), b"hello depot");
    }

    #[test]
    fn test_overwrite_is_silent() {
        let temp = TempDir::new().unwrap();
        let location = temp.path().join("payload.bin");

        write_atomic(&location, b"first").unwrap();
        write_atomic(&location, b"second").unwrap();
        assert_eq!(read(&location).unwrap(), b"second");
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp = TempDir::new().unwrap();
        let location = temp.path().join("payload.bin");

        write_atomic(&location, b"data").unwrap();

        let children: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(children, vec![std::ffi::OsString::from("payload.bin")]);
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let result = read(&temp.path().join("absent.bin"));
        assert!(matches!(result, Err(DepotError::NotFound(_))));
    }
}
