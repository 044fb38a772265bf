//! Migration from the pre-localmode config location.
//!
//! Older releases kept every file in one flat directory (the legacy root).
//! Migration moves files from there into the per-role directories the
//! context resolved. It never overwrites: an existing destination leaves the
//! source where it is. Failures are logged and reported, never fatal.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::context::AppContext;

/// A single migration step that did not complete.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read legacy directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid migration pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Moves a filesystem entry. The seam migration performs all moves through.
#[cfg_attr(test, mockall::automock)]
pub trait Relocator {
    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Suffix of the sibling a cross-device copy is staged in.
const STAGING_SUFFIX: &str = ".migrating";

/// Relocator backed by `std::fs`.
///
/// Falls back to copy and remove for files when a rename crosses devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRelocator;

impl Relocator for FsRelocator {
    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices && from.is_file() => {
                copy_then_remove(from, to, |from, to| fs::copy(from, to))
            }
            result => result,
        }
    }
}

/// Copy `from` into a staging sibling of `to`, rename it into place and
/// remove `from`.
///
/// `to` only ever appears complete. A failed copy removes the staging file
/// and leaves `from` untouched.
fn copy_then_remove(
    from: &Path,
    to: &Path,
    copy: impl FnOnce(&Path, &Path) -> io::Result<u64>,
) -> io::Result<()> {
    let staging = staging_path(to);
    let staged = copy(from, &staging).and_then(|_| fs::rename(&staging, to));
    if let Err(e) = staged {
        if let Err(cleanup) = fs::remove_file(&staging) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                warn!(
                    path = %staging.display(),
                    error = %cleanup,
                    "Failed to remove staging file"
                );
            }
        }
        return Err(e);
    }
    fs::remove_file(from)
}

fn staging_path(to: &Path) -> PathBuf {
    let mut name = to.file_name().map(OsString::from).unwrap_or_default();
    name.push(STAGING_SUFFIX);
    to.with_file_name(name)
}

/// Result of migrating a single file.
#[derive(Debug)]
pub enum MigrationOutcome {
    /// The legacy file was moved into place.
    Moved { from: PathBuf, to: PathBuf },
    /// The destination already exists; the legacy file was left untouched.
    AlreadyMigrated,
    /// There is no legacy file.
    NothingToMigrate,
    /// Local mode or no legacy root on this platform.
    Disabled,
    Failed(MigrationError),
}

impl MigrationOutcome {
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Per-item results of a directory migration.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Destinations that were filled from the legacy directory.
    pub moved: Vec<PathBuf>,
    /// Destinations that already existed; their legacy source was left alone.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<MigrationError>,
}

impl MigrationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Moves legacy files into their resolved locations.
pub struct Migrator<R = FsRelocator> {
    legacy_root: Option<PathBuf>,
    relocator: R,
}

impl Migrator<FsRelocator> {
    /// Migrator reading from `legacy_root`.
    pub fn new(legacy_root: impl Into<PathBuf>) -> Self {
        Self::with_relocator(Some(legacy_root.into()), FsRelocator)
    }

    /// Migrator for a resolved context. Disabled in local mode, where the
    /// layout was never split.
    pub fn for_context(ctx: &AppContext) -> Self {
        let legacy_root = if ctx.using_local_mode() {
            None
        } else {
            ctx.legacy_root().map(Path::to_path_buf)
        };
        Self::with_relocator(legacy_root, FsRelocator)
    }
}

impl<R: Relocator> Migrator<R> {
    pub const fn with_relocator(legacy_root: Option<PathBuf>, relocator: R) -> Self {
        Self {
            legacy_root,
            relocator,
        }
    }

    /// Move `<legacy root>/<file name of dest>` to `dest` unless `dest` exists.
    pub fn migrate_file(&self, dest: &Path) -> MigrationOutcome {
        let Some(legacy_root) = &self.legacy_root else {
            return MigrationOutcome::Disabled;
        };

        if exists(dest) {
            return MigrationOutcome::AlreadyMigrated;
        }

        let Some(name) = dest.file_name() else {
            return MigrationOutcome::NothingToMigrate;
        };
        let source = legacy_root.join(name);
        if !exists(&source) {
            return MigrationOutcome::NothingToMigrate;
        }

        if let Some(parent) = dest.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                let err = MigrationError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                };
                warn!(error = %err, "Migration failed");
                return MigrationOutcome::Failed(err);
            }
        }

        match self.relocator.relocate(&source, dest) {
            Ok(()) => {
                info!(from = %source.display(), to = %dest.display(), "Migrated legacy file");
                MigrationOutcome::Moved {
                    from: source,
                    to: dest.to_path_buf(),
                }
            }
            Err(e) => {
                let err = MigrationError::Move {
                    from: source,
                    to: dest.to_path_buf(),
                    source: e,
                };
                warn!(error = %err, "Migration failed");
                MigrationOutcome::Failed(err)
            }
        }
    }

    /// Move entries matching `pattern` from the legacy directory named like
    /// `new_dir` into `new_dir`.
    ///
    /// Files and directories are both moved. A failing entry is recorded and
    /// the remaining entries are still attempted.
    pub fn migrate_dir(&self, new_dir: &Path, pattern: &str) -> MigrationReport {
        let mut report = MigrationReport::default();

        let Some(legacy_root) = &self.legacy_root else {
            return report;
        };

        let matcher = match glob::Pattern::new(pattern) {
            Ok(matcher) => matcher,
            Err(source) => {
                let err = MigrationError::Pattern {
                    pattern: pattern.to_string(),
                    source,
                };
                warn!(error = %err, "Migration skipped");
                report.failed.push(err);
                return report;
            }
        };

        let Some(dir_name) = new_dir.file_name() else {
            return report;
        };
        let old_dir = legacy_root.join(dir_name);
        if !old_dir.is_dir() {
            debug!(dir = %old_dir.display(), "No legacy directory to migrate");
            return report;
        }

        let mut names = match fs::read_dir(&old_dir) {
            Ok(entries) => matching_names(
                entries.map(|entry| entry.map(|e| e.file_name())),
                &matcher,
                &old_dir,
                &mut report,
            ),
            Err(source) => {
                let err = MigrationError::ReadDir {
                    path: old_dir,
                    source,
                };
                warn!(error = %err, "Migration failed");
                report.failed.push(err);
                return report;
            }
        };
        names.sort();

        if names.is_empty() {
            return report;
        }

        if let Err(source) = fs::create_dir_all(new_dir) {
            let err = MigrationError::CreateDir {
                path: new_dir.to_path_buf(),
                source,
            };
            warn!(error = %err, "Migration failed");
            report.failed.push(err);
            return report;
        }

        for name in names {
            let from = old_dir.join(&name);
            let to = new_dir.join(&name);

            if exists(&to) {
                debug!(path = %to.display(), "Destination exists, leaving legacy entry");
                report.skipped.push(to);
                continue;
            }

            match self.relocator.relocate(&from, &to) {
                Ok(()) => {
                    debug!(from = %from.display(), to = %to.display(), "Migrated legacy entry");
                    report.moved.push(to);
                }
                Err(source) => {
                    let err = MigrationError::Move { from, to, source };
                    warn!(error = %err, "Migration failed");
                    report.failed.push(err);
                }
            }
        }

        info!(
            dir = %new_dir.display(),
            moved = report.moved.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Migrated legacy directory"
        );
        report
    }
}

impl AppContext {
    /// Migrate a single file from the pre-localmode config location.
    pub fn migrate(&self, dest: &Path) -> MigrationOutcome {
        Migrator::for_context(self).migrate_file(dest)
    }

    /// Migrate pattern-matched entries from the pre-localmode config location.
    pub fn migrate_dir(&self, new_dir: &Path, pattern: &str) -> MigrationReport {
        Migrator::for_context(self).migrate_dir(new_dir, pattern)
    }
}

/// Names accepted by `matcher`. Entries that could not be read are recorded
/// as failures against `dir`.
fn matching_names(
    entries: impl Iterator<Item = io::Result<OsString>>,
    matcher: &glob::Pattern,
    dir: &Path,
    report: &mut MigrationReport,
) -> Vec<OsString> {
    let mut names = Vec::new();
    for entry in entries {
        match entry {
            Ok(name) if matcher.matches(&name.to_string_lossy()) => names.push(name),
            Ok(_) => {}
            Err(source) => {
                let err = MigrationError::ReadDir {
                    path: dir.to_path_buf(),
                    source,
                };
                warn!(error = %err, "Migration failed");
                report.failed.push(err);
            }
        }
    }
    names
}

/// Like `Path::exists` but also true for dangling symlinks, which must not be
/// overwritten either.
fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
