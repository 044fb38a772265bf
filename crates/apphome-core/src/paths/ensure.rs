//! Directory creation and verification utilities.
//!
//! `ensure_directory` is the strict variant used for the user configuration
//! root. `ensure_exists` only makes sure a directory is there.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::error::PathError;

const WRITE_PROBE_FILE: &str = ".apphome_write_test";

/// Strategy for how to handle missing directories when ensuring they exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryCreationStrategy {
    /// Create directories automatically if they are missing.
    #[default]
    AutoCreate,
    /// Do not create directories; return an error if missing.
    Disallow,
}

/// Ensure the provided directory exists and is writable according to the chosen strategy.
///
/// If the directory exists, verifies it's actually a directory and is writable.
/// If the directory doesn't exist, behavior depends on `strategy`:
/// - `AutoCreate`: Creates the directory (and parents)
/// - `Disallow`: Returns an error
pub fn ensure_directory(path: &Path, strategy: DirectoryCreationStrategy) -> Result<(), PathError> {
    ensure_exists(path, strategy)?;
    verify_writable(path)
}

/// Ensure the directory exists without probing whether it is writable.
///
/// Used for roles that may legitimately be read-only (install locations).
pub fn ensure_exists(path: &Path, strategy: DirectoryCreationStrategy) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }

    match strategy {
        DirectoryCreationStrategy::AutoCreate => {
            fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
        DirectoryCreationStrategy::Disallow => {
            Err(PathError::DirectoryNotFound(path.to_path_buf()))
        }
    }
}

/// Verify a directory is writable by attempting to create a test file.
pub fn verify_writable(path: &Path) -> Result<(), PathError> {
    let test_file = path.join(WRITE_PROBE_FILE);
    let result = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&test_file);

    match result {
        Ok(mut file) => {
            file.write_all(b"test")
                .map_err(|e| PathError::NotWritable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            drop(file);
            let _ = fs::remove_file(&test_file);
            Ok(())
        }
        Err(err) => Err(PathError::NotWritable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn auto_create_makes_nested_directories() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("a").join("b");

        ensure_directory(&nested, DirectoryCreationStrategy::AutoCreate).unwrap();

        assert!(nested.is_dir());
        assert!(!nested.join(WRITE_PROBE_FILE).exists());
    }

    #[test]
    fn disallow_reports_missing_directory() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing");

        let err = ensure_exists(&missing, DirectoryCreationStrategy::Disallow).unwrap_err();
        assert!(matches!(err, PathError::DirectoryNotFound(_)));
        assert!(!missing.exists());
    }

    #[test]
    fn file_in_place_of_directory_is_rejected() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("occupied");
        fs::write(&file, b"x").unwrap();

        let err = ensure_directory(&file, DirectoryCreationStrategy::AutoCreate).unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));
        assert!(err.is_fatal());
    }
}
