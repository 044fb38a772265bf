//! XDG base-directory conventions for Linux and other POSIX systems.

use std::path::{Path, PathBuf};

use super::error::PathError;
use super::platform::{
    OsVersion, PlatformResolver, SystemRoots, absolute, current_executable, env_path,
    sysinfo_version,
};

/// Last-resort home when neither `HOME` nor the passwd database yield an
/// absolute path.
const FALLBACK_HOME: &str = "/tmp";

/// Snapshot of the environment variables the POSIX resolver consults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XdgEnv {
    pub home: Option<PathBuf>,
    pub config_home: Option<PathBuf>,
    pub data_home: Option<PathBuf>,
    pub cache_home: Option<PathBuf>,
    /// `XDG_DOWNLOAD_DIR` from `user-dirs.dirs`.
    pub download_dir: Option<PathBuf>,
}

impl XdgEnv {
    /// Read `HOME` and the XDG base-directory variables.
    ///
    /// Relative values are ignored, as XDG base directories must be absolute.
    pub fn from_env() -> Self {
        Self {
            home: env_path("HOME")
                .and_then(absolute)
                .or_else(|| dirs::home_dir().and_then(absolute)),
            config_home: env_path("XDG_CONFIG_HOME").and_then(absolute),
            data_home: env_path("XDG_DATA_HOME").and_then(absolute),
            cache_home: env_path("XDG_CACHE_HOME").and_then(absolute),
            download_dir: dirs::download_dir().and_then(absolute),
        }
    }
}

/// Resolver for XDG-style layouts.
///
/// | location      | path                                   |
/// |---------------|----------------------------------------|
/// | global config | `/etc/<app>`                           |
/// | user config   | `$XDG_CONFIG_HOME/<app>`               |
/// | user local    | `$XDG_DATA_HOME/<app>`                 |
/// | temp          | `$XDG_CACHE_HOME/<app>/tmp`            |
/// | resources     | `<exe dir>/../share/<app>`             |
/// | legacy root   | `$HOME/.<app>`                         |
#[derive(Debug, Clone)]
pub struct PosixResolver {
    env: XdgEnv,
}

impl PosixResolver {
    pub const fn new(env: XdgEnv) -> Self {
        Self { env }
    }

    pub fn from_env() -> Self {
        Self::new(XdgEnv::from_env())
    }

    fn home(&self) -> PathBuf {
        self.env
            .home
            .clone()
            .and_then(absolute)
            .unwrap_or_else(|| PathBuf::from(FALLBACK_HOME))
    }

    fn config_home(&self) -> PathBuf {
        self.env
            .config_home
            .clone()
            .and_then(absolute)
            .unwrap_or_else(|| self.home().join(".config"))
    }

    fn data_home(&self) -> PathBuf {
        self.env
            .data_home
            .clone()
            .and_then(absolute)
            .unwrap_or_else(|| self.home().join(".local").join("share"))
    }

    fn cache_home(&self) -> PathBuf {
        self.env
            .cache_home
            .clone()
            .and_then(absolute)
            .unwrap_or_else(|| self.home().join(".cache"))
    }
}

impl PlatformResolver for PosixResolver {
    fn executable_path(&self) -> Result<PathBuf, PathError> {
        current_executable()
    }

    fn system_roots(&self, app_name: &str) -> Result<SystemRoots, PathError> {
        Ok(SystemRoots {
            global_config: Path::new("/etc").join(app_name),
            user_config: self.config_home().join(app_name),
            user_local: self.data_home().join(app_name),
            downloads: self
                .env
                .download_dir
                .clone()
                .and_then(absolute)
                .unwrap_or_else(|| self.home().join("Downloads")),
            temp: self.cache_home().join(app_name).join("tmp"),
        })
    }

    fn resources_dir(&self, exe_dir: &Path, app_name: &str) -> PathBuf {
        exe_dir
            .parent()
            .unwrap_or(exe_dir)
            .join("share")
            .join(app_name)
    }

    fn legacy_root(&self, _exe_dir: &Path, app_name: &str) -> Option<PathBuf> {
        Some(self.home().join(format!(".{app_name}")))
    }

    fn home_dir(&self) -> Option<PathBuf> {
        Some(self.home())
    }

    fn platform_version(&self) -> Option<OsVersion> {
        sysinfo_version(true)
    }
}
