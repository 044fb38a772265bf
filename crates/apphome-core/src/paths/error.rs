//! Path-related error types.
//!
//! Provides semantic errors for path resolution and directory operations.
//! Only failures on the user configuration root abort initialization; the
//! rest are reported as diagnostics.

use std::path::PathBuf;
use thiserror::Error;

use super::PathRole;

/// Errors that can occur during path resolution and directory operations.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's home directory.
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// Could not determine where the running executable lives.
    #[error("Cannot determine executable location: {0}")]
    ExecutableLocation(String),

    /// A path was expected to be a directory but was not.
    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// A directory does not exist and creation was not allowed.
    #[error("Directory {0} does not exist")]
    DirectoryNotFound(PathBuf),

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// A directory is not writable.
    #[error("Directory {path} is not writable: {reason}")]
    NotWritable { path: PathBuf, reason: String },

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,

    /// Failed to read the boot config file.
    #[error("Failed to read boot config {path}: {reason}")]
    BootConfig { path: PathBuf, reason: String },

    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),
}

impl PathError {
    /// Whether this error must abort startup when raised for the user config root.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::CreateFailed { .. }
                | Self::NotWritable { .. }
                | Self::NotADirectory(_)
                | Self::NoHomeDir
                | Self::ExecutableLocation(_)
                | Self::EmptyPath
                | Self::CurrentDirError(_)
        )
    }
}

/// A non-fatal problem found while preparing a path role.
///
/// The role keeps its best-effort path; later I/O on it will surface its own
/// errors.
#[derive(Debug)]
pub struct PathDiagnostic {
    pub role: PathRole,
    pub error: PathError,
}

impl std::fmt::Display for PathDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.role, self.error)
    }
}
