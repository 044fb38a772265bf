//! Boot config: the marker file next to the executable that selects local mode.
//!
//! The file holds a single path, the user configuration root. Lines that are
//! blank or start with `#` are skipped. `%[NAME]` expands to the value of the
//! environment variable `NAME`.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::PathError;
use super::platform::normalize_user_path;

/// Config root used when the boot file exists but names no path.
pub const DEFAULT_LOCAL_CONFIG_DIR: &str = "Settings";

/// Read `<exe_dir>/<file_name>`.
///
/// Returns `Ok(None)` when there is no boot file, which means system mode.
pub fn load_boot_config(
    exe_dir: &Path,
    file_name: &str,
    home: Option<&Path>,
) -> Result<Option<PathBuf>, PathError> {
    let path = exe_dir.join(file_name);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(PathError::BootConfig {
                path,
                reason: e.to_string(),
            });
        }
    };

    parse_boot_config(&content, exe_dir, home, |name| env::var(name).ok()).map(Some)
}

/// Turn boot file contents into an absolute config root.
pub fn parse_boot_config(
    content: &str,
    exe_dir: &Path,
    home: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf, PathError> {
    let line = content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'));

    let Some(line) = line else {
        return Ok(exe_dir.join(DEFAULT_LOCAL_CONFIG_DIR));
    };

    let expanded = expand_placeholders(line, lookup);
    if expanded.trim().is_empty() {
        return Ok(exe_dir.join(DEFAULT_LOCAL_CONFIG_DIR));
    }
    normalize_user_path(&expanded, home, Some(exe_dir))
}

/// Replace every `%[NAME]` with `lookup(NAME)`; unknown names become empty.
fn expand_placeholders(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find("%[") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find(']') {
            Some(end) => {
                out.push_str(&lookup(&after[..end]).unwrap_or_default());
                rest = &after[end + 1..];
            }
            None => {
                // unterminated, keep verbatim
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
