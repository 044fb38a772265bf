//! Application directory resolution.
//!
//! Decides at startup whether an application runs in local mode (all state
//! next to the executable) or system mode (platform-standard per-user
//! directories), resolves every [`PathRole`] into an [`AppContext`], stores
//! raw startup parameters and migrates files left by the old flat layout.
//!
//! ```no_run
//! use apphome_core::{AppContext, InitOptions, PathRole};
//!
//! let ctx = AppContext::initialize(&InitOptions::new("myapp"))?;
//! let queue = ctx.path(PathRole::UserConfig).join("Queue.xml");
//! ctx.migrate(&queue);
//! # Ok::<(), apphome_core::PathError>(())
//! ```
#![deny(unused_crate_dependencies)]

pub mod context;
pub mod migrate;
pub mod paths;
pub mod startup;

pub use context::{AppContext, DEFAULT_APP_NAME, InitOptions, RUN_MARKER_FILE, ResolutionMode};
pub use migrate::{
    FsRelocator, MigrationError, MigrationOutcome, MigrationReport, Migrator, Relocator,
};
pub use paths::{
    OsVersion, PathDiagnostic, PathError, PathRole, PathTable, PlatformResolver, PosixResolver,
    SystemRoots, WindowsResolver, default_resolver,
};
pub use startup::{DEFAULT_FIRST_INSTANCE_ONLY, FirstInstancePolicy, StartupParams};
