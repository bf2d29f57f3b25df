//! Atomic write primitives
//!
//! temp→rename in the target's directory; the temp file is removed if any
//! step fails

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{io_error, Result};

/// Sibling temp path: `dir/.name.portsync.tmp`
fn temp_path_for(target_path: &Path) -> PathBuf {
    let name = target_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "state".to_string());
    target_path.with_file_name(format!(".{}.portsync.tmp", name))
}

/// Atomically write bytes to a file
///
/// # Errors
///
/// `Io` when the parent directory, temp file or rename fails.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error("create_target_dir", parent, e))?;
    }

    let temp_path = temp_path_for(target_path);
    let written = write_synced(&temp_path, content)
        .and_then(|()| fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_temp", target_path, e)));

    if written.is_err() {
        // best effort; the original error is what matters
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn write_synced(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| io_error("create_temp", path, e))?;
    file.write_all(content).map_err(|e| io_error("write_temp", path, e))?;
    file.sync_all().map_err(|e| io_error("sync_temp", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn leftover_temp_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count()
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("terraform.tfstate");

        atomic_write(&target, b"old").unwrap();
        atomic_write(&target, b"new").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert_eq!(leftover_temp_files(temp_dir.path()), 0);
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("fixed").join("terraform.tfstate");

        atomic_write(&target, b"nested").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"nested");
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        // renaming a file over a non-empty directory fails
        let target = temp_dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        assert!(atomic_write(&target, b"content").is_err());
        assert_eq!(leftover_temp_files(temp_dir.path()), 0);
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_temp_path_is_a_hidden_sibling() {
        let temp = temp_path_for(Path::new("/srv/tf/prod.tfstate"));
        assert_eq!(temp, PathBuf::from("/srv/tf/.prod.tfstate.portsync.tmp"));
    }
}
