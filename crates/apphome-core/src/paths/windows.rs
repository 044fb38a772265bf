//! Per-user application-data conventions for Windows.

use std::path::{Path, PathBuf};

use super::error::PathError;
use super::platform::{
    OsVersion, PlatformResolver, SystemRoots, absolute, current_executable, env_path,
    sysinfo_version,
};

/// Snapshot of the environment variables the Windows resolver consults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppDataEnv {
    pub app_data: Option<PathBuf>,
    pub local_app_data: Option<PathBuf>,
    pub user_profile: Option<PathBuf>,
}

impl AppDataEnv {
    /// Read `APPDATA`, `LOCALAPPDATA` and `USERPROFILE`, falling back to the
    /// known-folder lookups from `dirs`. Relative values are ignored.
    pub fn from_env() -> Self {
        let lookup = |key: &str, known: fn() -> Option<PathBuf>| {
            env_path(key)
                .and_then(absolute)
                .or_else(|| known().and_then(absolute))
        };
        Self {
            app_data: lookup("APPDATA", dirs::config_dir),
            local_app_data: lookup("LOCALAPPDATA", dirs::data_local_dir),
            user_profile: lookup("USERPROFILE", dirs::home_dir),
        }
    }

    fn app_data(&self) -> Option<PathBuf> {
        self.app_data.clone().and_then(absolute)
    }

    fn local_app_data(&self) -> Option<PathBuf> {
        self.local_app_data.clone().and_then(absolute)
    }

    fn user_profile(&self) -> Option<PathBuf> {
        self.user_profile.clone().and_then(absolute)
    }
}

/// Resolver for `%APPDATA%`-style layouts.
///
/// Global configuration and resources both live next to the executable.
/// Releases before split directories kept everything in `<exe dir>\Settings`.
#[derive(Debug, Clone)]
pub struct WindowsResolver {
    env: AppDataEnv,
}

impl WindowsResolver {
    pub const fn new(env: AppDataEnv) -> Self {
        Self { env }
    }

    pub fn from_env() -> Self {
        Self::new(AppDataEnv::from_env())
    }
}

impl PlatformResolver for WindowsResolver {
    fn executable_path(&self) -> Result<PathBuf, PathError> {
        current_executable()
    }

    fn system_roots(&self, app_name: &str) -> Result<SystemRoots, PathError> {
        let app_data = self
            .env
            .app_data()
            .or_else(|| self.env.local_app_data())
            .ok_or(PathError::NoHomeDir)?;
        let local_app_data = self
            .env
            .local_app_data()
            .unwrap_or_else(|| app_data.clone());
        let profile = self
            .env
            .user_profile()
            .unwrap_or_else(|| app_data.clone());

        let exe_dir = self
            .executable_path()?
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| PathError::ExecutableLocation("executable has no parent".into()))?;

        Ok(SystemRoots {
            global_config: exe_dir,
            user_config: app_data.join(app_name),
            user_local: local_app_data.join(app_name),
            downloads: profile.join("Downloads"),
            temp: local_app_data.join(app_name).join("Temp"),
        })
    }

    fn resources_dir(&self, exe_dir: &Path, _app_name: &str) -> PathBuf {
        exe_dir.to_path_buf()
    }

    fn legacy_root(&self, exe_dir: &Path, _app_name: &str) -> Option<PathBuf> {
        Some(exe_dir.join("Settings"))
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.env.user_profile()
    }

    fn platform_version(&self) -> Option<OsVersion> {
        sysinfo_version(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(base: &Path) -> AppDataEnv {
        AppDataEnv {
            app_data: Some(base.join("Roaming")),
            local_app_data: Some(base.join("Local")),
            user_profile: Some(base.join("Profile")),
        }
    }

    fn users() -> PathBuf {
        std::env::temp_dir().join("users")
    }

    #[test]
    fn splits_roaming_and_local_data() {
        let base = &users();
        let roots = WindowsResolver::new(env(base)).system_roots("app").unwrap();

        assert_eq!(roots.user_config, base.join("Roaming").join("app"));
        assert_eq!(roots.user_local, base.join("Local").join("app"));
        assert_eq!(roots.temp, base.join("Local").join("app").join("Temp"));
        assert_eq!(roots.downloads, base.join("Profile").join("Downloads"));
    }

    #[test]
    fn missing_local_app_data_reuses_roaming() {
        let base = &users();
        let resolver = WindowsResolver::new(AppDataEnv {
            local_app_data: None,
            ..env(base)
        });
        let roots = resolver.system_roots("app").unwrap();
        assert_eq!(roots.user_local, base.join("Roaming").join("app"));
    }

    #[test]
    fn no_app_data_at_all_is_an_error() {
        let resolver = WindowsResolver::new(AppDataEnv::default());
        assert!(matches!(
            resolver.system_roots("app"),
            Err(PathError::NoHomeDir)
        ));
    }

    #[test]
    fn relative_app_data_values_are_ignored() {
        let base = &users();
        let resolver = WindowsResolver::new(AppDataEnv {
            app_data: Some("Roaming".into()),
            user_profile: Some("Profile".into()),
            ..env(base)
        });
        let roots = resolver.system_roots("app").unwrap();

        assert_eq!(roots.user_config, base.join("Local").join("app"));
        assert_eq!(roots.downloads, base.join("Local").join("Downloads"));
        assert_eq!(resolver.home_dir(), None);

        let relative_only = WindowsResolver::new(AppDataEnv {
            app_data: Some("Roaming".into()),
            local_app_data: Some("Local".into()),
            user_profile: None,
        });
        assert!(matches!(
            relative_only.system_roots("app"),
            Err(PathError::NoHomeDir)
        ));
    }

    #[test]
    fn install_locations_are_the_exe_dir() {
        let resolver = WindowsResolver::new(AppDataEnv::default());
        let exe_dir = Path::new("install");
        assert_eq!(resolver.resources_dir(exe_dir, "app"), exe_dir);
        assert_eq!(
            resolver.legacy_root(exe_dir, "app"),
            Some(exe_dir.join("Settings"))
        );
    }
}
