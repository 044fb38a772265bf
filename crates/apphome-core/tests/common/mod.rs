//! Shared fixtures: a platform resolver pinned inside a temp directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use apphome_core::paths::{OsVersion, PathError, PlatformResolver, SystemRoots};
use tempfile::TempDir;

pub const APP: &str = "testapp";

/// Resolver whose every location lives under one temp directory.
pub struct SandboxResolver {
    pub exe: PathBuf,
    pub home: PathBuf,
    pub roots: SystemRoots,
    pub legacy: PathBuf,
    pub version: Option<OsVersion>,
    /// Make `system_roots` fail the way a Windows session without `APPDATA` does.
    pub roots_unavailable: bool,
}

impl PlatformResolver for SandboxResolver {
    fn executable_path(&self) -> Result<PathBuf, PathError> {
        Ok(self.exe.clone())
    }

    fn system_roots(&self, _app_name: &str) -> Result<SystemRoots, PathError> {
        if self.roots_unavailable {
            return Err(PathError::NoHomeDir);
        }
        Ok(self.roots.clone())
    }

    fn resources_dir(&self, exe_dir: &Path, app_name: &str) -> PathBuf {
        exe_dir.parent().unwrap().join("share").join(app_name)
    }

    fn legacy_root(&self, _exe_dir: &Path, _app_name: &str) -> Option<PathBuf> {
        Some(self.legacy.clone())
    }

    fn home_dir(&self) -> Option<PathBuf> {
        Some(self.home.clone())
    }

    fn platform_version(&self) -> Option<OsVersion> {
        self.version
    }
}

pub struct Sandbox {
    pub temp: TempDir,
    pub resolver: SandboxResolver,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let bin = root.join("install").join("bin");
        fs::create_dir_all(&bin).unwrap();
        let exe = bin.join(APP);
        fs::write(&exe, b"").unwrap();

        let home = root.join("home");
        let resolver = SandboxResolver {
            exe,
            roots: SystemRoots {
                global_config: root.join("etc").join(APP),
                user_config: home.join(".config").join(APP),
                user_local: home.join(".local/share").join(APP),
                downloads: home.join("Downloads"),
                temp: home.join(".cache").join(APP).join("tmp"),
            },
            legacy: home.join(format!(".{APP}")),
            home,
            version: Some(OsVersion { major: 6, minor: 18 }),
            roots_unavailable: false,
        };

        Self { temp, resolver }
    }

    pub fn exe_dir(&self) -> PathBuf {
        self.resolver.exe.parent().unwrap().to_path_buf()
    }

    pub fn write_boot(&self, content: &str) {
        fs::write(self.exe_dir().join(format!("{APP}.boot")), content).unwrap();
    }
}
