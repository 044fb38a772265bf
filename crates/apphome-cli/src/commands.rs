//! Available subcommands.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Show resolved paths, mode and startup facts
    Paths {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a startup parameter among the arguments after `--`
    Param {
        /// Key to look for (`key` or `key=value` entries)
        key: String,
        /// Startup parameters, in order
        #[arg(last = true)]
        params: Vec<String>,
    },

    /// Rebuild the command line passed on to a relaunched instance
    RestartArgs {
        /// Build it for the first-launched instance (keeps first-instance-only flags)
        #[arg(long)]
        first: bool,
        /// Startup parameters, in order
        #[arg(last = true)]
        params: Vec<String>,
    },

    /// Move files left in the legacy flat config directory into place
    Migrate {
        /// Destination file; relative paths are taken from the user config dir
        #[arg(required_unless_present = "dir", conflicts_with = "dir")]
        file: Option<PathBuf>,
        /// Destination directory; relative paths are taken from the user config dir
        #[arg(long, requires = "pattern")]
        dir: Option<PathBuf>,
        /// Glob selecting entries of the legacy directory (e.g. "*.xml")
        #[arg(long, requires = "dir")]
        pattern: Option<String>,
    },
}
