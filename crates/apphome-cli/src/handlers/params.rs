//! Startup parameter handlers.

use apphome_core::{FirstInstancePolicy, StartupParams};

use crate::error::CliError;

/// Print the value recorded for `key`.
pub fn lookup(key: &str, params: &StartupParams) -> Result<(), CliError> {
    let value = params
        .get(key)
        .ok_or_else(|| CliError::Arguments(format!("{key} was not given")))?;
    println!("{value}");
    Ok(())
}

/// Print the command line a relaunched instance would receive.
pub fn restart_args(params: &StartupParams, is_first: bool) {
    println!(
        "{}",
        params.to_command_line(is_first, &FirstInstancePolicy::default())
    );
}
