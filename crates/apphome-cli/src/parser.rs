//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use apphome_core::DEFAULT_APP_NAME;
use clap::Parser;

use crate::commands::Commands;

/// Inspect where an application keeps its configuration, data and temp files.
#[derive(Parser)]
#[command(name = "apphome")]
#[command(about = "Resolve application directories, startup parameters and legacy migration")]
#[command(version)]
pub struct Cli {
    /// Use this directory as the user config root instead of detecting one
    #[arg(long = "config-dir", global = true, env = "APPHOME_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Application name used for platform directories
    #[arg(long = "app-name", global = true, default_value = DEFAULT_APP_NAME)]
    pub app_name: String,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
