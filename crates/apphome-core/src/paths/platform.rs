//! Platform capability interface and shared helpers.
//!
//! Each platform convention is a [`PlatformResolver`] implementation. Both
//! implementations compile everywhere so they can be exercised in tests; the
//! one matching the build target is picked by [`default_resolver`].

use std::env;
use std::path::{Component, Path, PathBuf};

use super::error::PathError;

/// Platform-standard per-user locations, before any role derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemRoots {
    /// Machine-wide configuration directory.
    pub global_config: PathBuf,
    /// Per-user configuration directory.
    pub user_config: PathBuf,
    /// Per-user local (non-roaming) data directory.
    pub user_local: PathBuf,
    /// Default download directory.
    pub downloads: PathBuf,
    /// Scratch directory for temporary files.
    pub temp: PathBuf,
}

/// Operating system version, when the platform exposes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
}

impl std::fmt::Display for OsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Capability interface over a platform's directory conventions.
///
/// Implementations read the environment once at construction; the methods
/// themselves are pure so a resolved layout is reproducible.
pub trait PlatformResolver: Send + Sync {
    /// Absolute path of the running executable.
    fn executable_path(&self) -> Result<PathBuf, PathError>;

    /// Platform-standard locations for `app_name` in system mode.
    fn system_roots(&self, app_name: &str) -> Result<SystemRoots, PathError>;

    /// Install-relative resource directory for an executable living in `exe_dir`.
    fn resources_dir(&self, exe_dir: &Path, app_name: &str) -> PathBuf;

    /// Flat directory used by releases that predate split per-role directories.
    fn legacy_root(&self, exe_dir: &Path, app_name: &str) -> Option<PathBuf>;

    /// Home directory used to expand `~` in user supplied paths.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Operating system major/minor version, if obtainable.
    fn platform_version(&self) -> Option<OsVersion>;
}

/// Resolver matching the platform this binary was built for.
pub fn default_resolver() -> Box<dyn PlatformResolver> {
    #[cfg(windows)]
    {
        Box::new(super::windows::WindowsResolver::from_env())
    }

    #[cfg(not(windows))]
    {
        Box::new(super::posix::PosixResolver::from_env())
    }
}

/// Path of the running executable as reported by the OS.
pub(super) fn current_executable() -> Result<PathBuf, PathError> {
    env::current_exe()
        .and_then(|p| p.canonicalize().or(Ok(p)))
        .map_err(|e| PathError::ExecutableLocation(e.to_string()))
}

/// Read a non-empty environment variable as a path.
pub(super) fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Keep `path` only when it is absolute.
pub(super) fn absolute(path: PathBuf) -> Option<PathBuf> {
    path.is_absolute().then_some(path)
}

/// Query the OS version through `sysinfo`.
///
/// POSIX systems report the kernel release, Windows reports its product version.
pub(super) fn sysinfo_version(prefer_kernel: bool) -> Option<OsVersion> {
    let raw = if prefer_kernel {
        sysinfo::System::kernel_version().or_else(sysinfo::System::os_version)
    } else {
        sysinfo::System::os_version().or_else(sysinfo::System::kernel_version)
    };
    raw.as_deref().and_then(parse_os_version)
}

/// Extract `major.minor` from the first numeric run of a version string.
///
/// `"6.18.44-fc-v139"` yields `6.18`, `"11 (22631)"` yields `11.0`.
pub fn parse_os_version(raw: &str) -> Option<OsVersion> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let mut parts = raw[start..]
        .split(|c: char| !c.is_ascii_digit() && c != '.')
        .next()?
        .split('.');

    let major = parts.next()?.parse().ok()?;
    let minor = parts
        .next()
        .and_then(|m| m.parse().ok())
        .unwrap_or(0);
    Some(OsVersion { major, minor })
}

/// Normalize a user-provided path string, expanding `~` and making it absolute.
///
/// Surrounding whitespace is trimmed. See [`normalize_path`].
pub(crate) fn normalize_user_path(
    raw: &str,
    home: Option<&Path>,
    base: Option<&Path>,
) -> Result<PathBuf, PathError> {
    normalize_path(Path::new(raw.trim()), home, base)
}

/// Normalize a path, expanding a leading `~` component and making it absolute.
///
/// Relative paths are anchored at `base`, or the current directory when no
/// base is given. The path is never re-encoded.
pub(crate) fn normalize_path(
    raw: &Path,
    home: Option<&Path>,
    base: Option<&Path>,
) -> Result<PathBuf, PathError> {
    if raw.as_os_str().is_empty() {
        return Err(PathError::EmptyPath);
    }

    let mut components = raw.components();
    let expanded = match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = home.ok_or(PathError::NoHomeDir)?;
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                home.to_path_buf()
            } else {
                home.join(rest)
            }
        }
        _ => raw.to_path_buf(),
    };

    if expanded.is_absolute() {
        return Ok(expanded);
    }

    match base {
        Some(base) => Ok(base.join(expanded)),
        None => env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string())),
    }
}
