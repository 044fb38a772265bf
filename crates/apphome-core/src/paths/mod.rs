//! Path resolution for configuration, data, cache and temporary locations.
//!
//! This module owns the building blocks the application context is assembled
//! from:
//! - The fixed set of [`PathRole`]s and the [`PathTable`] indexed by them
//! - Platform conventions behind the [`PlatformResolver`] capability
//! - The boot config that switches an installation into local mode
//! - Directory creation and write probing
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Environment variables are read once, when a resolver is constructed
//! - Both platform resolvers compile everywhere; `default_resolver` picks one

mod boot;
mod ensure;
mod error;
mod platform;
mod posix;
mod role;
mod table;
mod windows;

// Error types
pub use error::{PathDiagnostic, PathError};

// Roles and the resolved table
pub use role::PathRole;
pub use table::PathTable;

// Platform capability and implementations
pub use platform::{OsVersion, PlatformResolver, SystemRoots, default_resolver, parse_os_version};
pub use posix::{PosixResolver, XdgEnv};
pub use windows::{AppDataEnv, WindowsResolver};

// Boot config
pub use boot::{DEFAULT_LOCAL_CONFIG_DIR, load_boot_config, parse_boot_config};

// Directory operations
pub use ensure::{DirectoryCreationStrategy, ensure_directory, ensure_exists, verify_writable};

pub(crate) use platform::normalize_path;
