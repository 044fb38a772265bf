//! Migrate command handler.

use std::path::{Path, PathBuf};

use anyhow::Result;
use apphome_core::{AppContext, MigrationOutcome, PathRole};

/// Migrate a single file into `dest`.
pub fn file(ctx: &AppContext, dest: &Path) -> Result<()> {
    let dest = resolve(ctx, dest);
    match ctx.migrate(&dest) {
        MigrationOutcome::Moved { from, to } => {
            println!("moved {} -> {}", from.display(), to.display());
        }
        MigrationOutcome::AlreadyMigrated => println!("{} already exists", dest.display()),
        MigrationOutcome::NothingToMigrate => println!("nothing to migrate"),
        MigrationOutcome::Disabled => println!("migration disabled (local mode)"),
        MigrationOutcome::Failed(err) => println!("failed: {err}"),
    }
    Ok(())
}

/// Migrate entries matching `pattern` into `dest`.
pub fn dir(ctx: &AppContext, dest: &Path, pattern: &str) -> Result<()> {
    let dest = resolve(ctx, dest);
    let report = ctx.migrate_dir(&dest, pattern);

    for path in &report.moved {
        println!("moved {}", path.display());
    }
    for path in &report.skipped {
        println!("kept existing {}", path.display());
    }
    for err in &report.failed {
        println!("failed: {err}");
    }
    if report.moved.is_empty() && report.skipped.is_empty() && report.is_clean() {
        println!("nothing to migrate");
    }
    Ok(())
}

/// Relative destinations are taken from the user config dir.
fn resolve(ctx: &AppContext, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        ctx.path(PathRole::UserConfig).join(path)
    }
}
