//! Process-scoped application context.
//!
//! [`AppContext::initialize`] decides between local and system mode, resolves
//! every [`PathRole`] and prepares the directories. It must run once, before
//! other threads start reading paths; calling it again produces an
//! independent context and is the caller's business to avoid.
//!
//! After construction the context is immutable and can be shared freely
//! (`&AppContext` or `Arc<AppContext>`).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::paths::{
    DirectoryCreationStrategy, OsVersion, PathDiagnostic, PathError, PathRole, PathTable,
    DEFAULT_LOCAL_CONFIG_DIR, PlatformResolver, SystemRoots, default_resolver, ensure_directory,
    ensure_exists, load_boot_config, normalize_path,
};

/// Application name used for platform directories when none is configured.
pub const DEFAULT_APP_NAME: &str = "apphome";

/// Marker kept in the user config root while the application is running.
pub const RUN_MARKER_FILE: &str = ".running";

/// Subdirectory of the temp role used for files opened by the user.
const OPEN_DIR: &str = "Open";

/// Inputs to [`AppContext::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOptions {
    /// Directory name under platform roots (`~/.config/<app_name>`).
    pub app_name: String,
    /// Authoritative user config root; skips boot config detection.
    pub config_path_override: Option<PathBuf>,
    /// Boot config file name next to the executable. Defaults to `<app_name>.boot`.
    pub boot_file_name: Option<String>,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self::new(DEFAULT_APP_NAME)
    }
}

impl InitOptions {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            config_path_override: None,
            boot_file_name: None,
        }
    }

    /// Use `path` as the user config root. An empty path is ignored.
    #[must_use]
    pub fn with_config_override(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.config_path_override = (!path.as_os_str().is_empty()).then_some(path);
        self
    }

    #[must_use]
    pub fn with_boot_file_name(mut self, name: impl Into<String>) -> Self {
        self.boot_file_name = Some(name.into());
        self
    }

    pub fn boot_file_name(&self) -> String {
        self.boot_file_name
            .clone()
            .unwrap_or_else(|| format!("{}.boot", self.app_name))
    }
}

/// How the user config root was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// A boot config next to the executable: everything lives in the install tree.
    Local,
    /// The caller supplied the config root. Not local mode.
    Override,
    /// Platform-standard per-user directories.
    System,
}

/// Resolved locations and startup facts for the running process.
#[derive(Debug)]
pub struct AppContext {
    paths: PathTable,
    mode: ResolutionMode,
    app_file_path: PathBuf,
    legacy_root: Option<PathBuf>,
    unclean_shutdown: bool,
    os_version: Option<OsVersion>,
    diagnostics: Vec<PathDiagnostic>,
}

impl AppContext {
    /// Initialize against the platform this binary was built for.
    pub fn initialize(options: &InitOptions) -> Result<Self, PathError> {
        Self::initialize_with(default_resolver().as_ref(), options)
    }

    /// Initialize against an explicit platform resolver.
    ///
    /// Fails only when the user config root cannot be created or written.
    /// Problems with other roles are kept as [`diagnostics`](Self::diagnostics).
    pub fn initialize_with(
        resolver: &dyn PlatformResolver,
        options: &InitOptions,
    ) -> Result<Self, PathError> {
        let app_name = options.app_name.as_str();
        let app_file_path = resolver.executable_path()?;
        let exe_dir = app_file_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| PathError::ExecutableLocation("executable has no parent".into()))?;

        let (mode, user_config) = resolve_config_root(resolver, options, &exe_dir)?;
        let roots = match mode {
            ResolutionMode::Local => None,
            ResolutionMode::System => Some(resolver.system_roots(app_name)?),
            ResolutionMode::Override => match resolver.system_roots(app_name) {
                Ok(roots) => Some(roots),
                Err(e) => {
                    warn!(error = %e, "Platform roots unavailable, deriving from config override");
                    None
                }
            },
        };

        let resources = match mode {
            ResolutionMode::Local => exe_dir.clone(),
            ResolutionMode::Override | ResolutionMode::System => {
                resolver.resources_dir(&exe_dir, app_name)
            }
        };
        let paths = derive_paths(
            mode,
            &exe_dir,
            user_config
                .or_else(|| roots.as_ref().map(|r| r.user_config.clone()))
                .ok_or(PathError::NoHomeDir)?,
            resources,
            roots.as_ref(),
        );

        info!(
            mode = ?mode,
            user_config = %paths[PathRole::UserConfig].display(),
            "Resolved application paths"
        );

        let diagnostics = prepare_directories(&paths)?;
        let unclean_shutdown = claim_run_marker(&paths[PathRole::UserConfig]);
        if unclean_shutdown {
            warn!("Previous run did not shut down cleanly");
        }

        let os_version = resolver.platform_version();
        debug!(os_version = ?os_version, "Platform version");

        Ok(Self {
            legacy_root: resolver.legacy_root(&exe_dir, app_name),
            paths,
            mode,
            app_file_path,
            unclean_shutdown,
            os_version,
            diagnostics,
        })
    }

    /// Path of configuration files.
    pub fn path(&self, role: PathRole) -> &Path {
        self.paths.get(role)
    }

    pub const fn paths(&self) -> &PathTable {
        &self.paths
    }

    /// Path of file lists
    pub fn list_path(&self) -> &Path {
        self.path(PathRole::FileLists)
    }

    /// Path of bundles
    pub fn bundle_path(&self) -> &Path {
        self.path(PathRole::Bundles)
    }

    pub fn share_cache_path(&self) -> &Path {
        self.path(PathRole::ShareCache)
    }

    pub fn temp_path(&self) -> &Path {
        self.path(PathRole::Temp)
    }

    /// Path of temporary storage for files opened by the user.
    pub fn open_path(&self) -> PathBuf {
        self.temp_path().join(OPEN_DIR)
    }

    /// Full path of the running executable.
    pub fn app_file_path(&self) -> &Path {
        &self.app_file_path
    }

    /// Directory containing the running executable.
    pub fn app_path(&self) -> &Path {
        self.app_file_path.parent().unwrap_or(&self.app_file_path)
    }

    pub fn app_file_name(&self) -> Option<&str> {
        self.app_file_path.file_name().and_then(|n| n.to_str())
    }

    /// In local mode, all config and temp files are kept in the same dir as the executable.
    pub const fn using_local_mode(&self) -> bool {
        matches!(self.mode, ResolutionMode::Local)
    }

    pub const fn mode(&self) -> ResolutionMode {
        self.mode
    }

    pub const fn was_unclean_shutdown(&self) -> bool {
        self.unclean_shutdown
    }

    /// OS major/minor version; `None` where the platform does not expose one.
    pub const fn os_version(&self) -> Option<OsVersion> {
        self.os_version
    }

    /// Non-fatal problems met while preparing directories.
    pub fn diagnostics(&self) -> &[PathDiagnostic] {
        &self.diagnostics
    }

    /// Flat directory of the pre-localmode layout that migration reads from.
    pub fn legacy_root(&self) -> Option<&Path> {
        self.legacy_root.as_deref()
    }

    /// Remove the run marker so the next start is not reported as unclean.
    pub fn mark_clean_shutdown(&self) {
        let marker = self.path(PathRole::UserConfig).join(RUN_MARKER_FILE);
        match fs::remove_file(&marker) {
            Ok(()) => debug!(marker = %marker.display(), "Removed run marker"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(marker = %marker.display(), error = %e, "Failed to remove run marker"),
        }
    }
}

/// Pick the user config root and the mode it implies.
///
/// Returns `None` as root in system mode; the platform roots supply it.
fn resolve_config_root(
    resolver: &dyn PlatformResolver,
    options: &InitOptions,
    exe_dir: &Path,
) -> Result<(ResolutionMode, Option<PathBuf>), PathError> {
    let home = resolver.home_dir();

    if let Some(raw) = &options.config_path_override {
        let root = normalize_path(raw, home.as_deref(), None)?;
        return Ok((ResolutionMode::Override, Some(root)));
    }

    match load_boot_config(exe_dir, &options.boot_file_name(), home.as_deref()) {
        Ok(Some(root)) => Ok((ResolutionMode::Local, Some(root))),
        Ok(None) => Ok((ResolutionMode::System, None)),
        Err(e) => {
            let root = exe_dir.join(DEFAULT_LOCAL_CONFIG_DIR);
            warn!(
                error = %e,
                root = %root.display(),
                "Unusable boot config, using default local config root"
            );
            Ok((ResolutionMode::Local, Some(root)))
        }
    }
}

fn derive_paths(
    mode: ResolutionMode,
    exe_dir: &Path,
    user_config: PathBuf,
    resources: PathBuf,
    roots: Option<&SystemRoots>,
) -> PathTable {
    let user_local = match (mode, roots) {
        (ResolutionMode::System, Some(r)) => r.user_local.clone(),
        _ => user_config.clone(),
    };

    PathTable::from_fn(|role| match role {
        PathRole::GlobalConfig => {
            roots.map_or_else(|| exe_dir.to_path_buf(), |r| r.global_config.clone())
        }
        PathRole::UserConfig => user_config.clone(),
        PathRole::UserLocale => user_local.clone(),
        PathRole::Resources => resources.clone(),
        PathRole::Locale => resources.join("locale"),
        PathRole::Downloads => {
            roots.map_or_else(|| user_config.join("Downloads"), |r| r.downloads.clone())
        }
        PathRole::FileLists => user_local.join("FileLists"),
        PathRole::Bundles => user_config.join("Bundles"),
        PathRole::ShareCache => user_local.join("ShareCache"),
        PathRole::Temp => roots.map_or_else(|| user_config.join("tmp"), |r| r.temp.clone()),
    })
}

/// Create the directories every role points at.
///
/// Only a failure on the user config root is returned as an error.
fn prepare_directories(paths: &PathTable) -> Result<Vec<PathDiagnostic>, PathError> {
    let user_config = &paths[PathRole::UserConfig];
    ensure_directory(user_config, DirectoryCreationStrategy::AutoCreate)?;

    let mut diagnostics = Vec::new();
    for (role, path) in paths.iter() {
        if role == PathRole::UserConfig {
            continue;
        }

        let strategy = if role.is_install_location() {
            DirectoryCreationStrategy::Disallow
        } else {
            DirectoryCreationStrategy::AutoCreate
        };

        if let Err(error) = ensure_exists(path, strategy) {
            if role.is_install_location() {
                debug!(
                    role = %role,
                    path = %path.display(),
                    error = %error,
                    "Install location unavailable"
                );
            } else {
                warn!(
                    role = %role,
                    path = %path.display(),
                    error = %error,
                    "Failed to prepare directory"
                );
            }
            diagnostics.push(PathDiagnostic { role, error });
        }
    }

    Ok(diagnostics)
}

/// Check for a run marker left by a previous process and claim it for this one.
///
/// Returns `true` when a stale marker was found.
fn claim_run_marker(user_config: &Path) -> bool {
    let marker = user_config.join(RUN_MARKER_FILE);
    let stale = marker.exists();

    if let Err(e) = fs::write(&marker, std::process::id().to_string()) {
        warn!(marker = %marker.display(), error = %e, "Failed to write run marker");
    }

    stale
}
