//! CLI bootstrap - the composition root.
//!
//! Turns parsed arguments into [`InitOptions`] and initializes the
//! application context. Handlers receive the resolved context.

use std::path::PathBuf;

use apphome_core::{AppContext, InitOptions, PathError};
use tracing::{debug, warn};

use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub app_name: String,
    pub config_dir: Option<PathBuf>,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            app_name: cli.app_name.clone(),
            config_dir: cli.config_dir.clone(),
        }
    }

    pub fn init_options(&self) -> InitOptions {
        let options = InitOptions::new(self.app_name.clone());
        match &self.config_dir {
            Some(dir) => options.with_config_override(dir),
            None => options,
        }
    }
}

/// Resolve the application context.
///
/// Only a fatal failure on the user config root is returned; degraded roles
/// are logged.
pub fn bootstrap(config: &CliConfig) -> Result<AppContext, PathError> {
    let ctx = AppContext::initialize(&config.init_options())?;

    for diagnostic in ctx.diagnostics() {
        debug!(%diagnostic, "Path role degraded");
    }
    if ctx.was_unclean_shutdown() {
        warn!("Previous {} run did not exit cleanly", config.app_name);
    }

    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_becomes_override() {
        let config = CliConfig {
            app_name: "tool".into(),
            config_dir: Some(PathBuf::from("/srv/tool")),
        };
        let options = config.init_options();
        assert_eq!(options.app_name, "tool");
        assert_eq!(options.config_path_override, Some(PathBuf::from("/srv/tool")));
    }

    #[test]
    fn no_config_dir_means_detection() {
        let config = CliConfig {
            app_name: "tool".into(),
            config_dir: None,
        };
        assert_eq!(config.init_options().config_path_override, None);
    }
}
