//! Paths command handler.
//!
//! Displays all resolved paths for diagnostics and debugging.

use std::fmt::Write as _;

use anyhow::Result;
use apphome_core::AppContext;
use serde_json::json;

/// Execute the paths command.
pub fn execute(ctx: &AppContext, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&to_json(ctx))?);
    } else {
        print!("{}", render(ctx));
    }
    Ok(())
}

/// `key = value` lines: the path table followed by startup facts.
pub fn render(ctx: &AppContext) -> String {
    let mut out = ctx.paths().to_string();
    let _ = writeln!(out, "mode = {:?}", ctx.mode());
    let _ = writeln!(out, "local_mode = {}", ctx.using_local_mode());
    let _ = writeln!(out, "unclean_shutdown = {}", ctx.was_unclean_shutdown());
    match ctx.os_version() {
        Some(version) => {
            let _ = writeln!(out, "os_version = {version}");
        }
        None => out.push_str("os_version = unknown\n"),
    }
    if let Some(legacy) = ctx.legacy_root() {
        let _ = writeln!(out, "legacy_root = {}", legacy.display());
    }
    for diagnostic in ctx.diagnostics() {
        let _ = writeln!(out, "warning = {diagnostic}");
    }
    out
}

fn to_json(ctx: &AppContext) -> serde_json::Value {
    json!({
        "mode": ctx.mode(),
        "local_mode": ctx.using_local_mode(),
        "unclean_shutdown": ctx.was_unclean_shutdown(),
        "os_version": ctx.os_version().map(|v| v.to_string()),
        "legacy_root": ctx.legacy_root().map(|p| p.to_string_lossy().into_owned()),
        "paths": ctx.paths(),
        "diagnostics": ctx
            .diagnostics()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
    })
}
