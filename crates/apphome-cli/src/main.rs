//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use apphome_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};
use apphome_core::StartupParams;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = CliConfig::from_cli(&cli);

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help().map_err(anyhow::Error::from)?;
        return Ok(());
    };

    match command {
        Commands::Param { key, params } => {
            handlers::params::lookup(&key, &StartupParams::from_args(params))?;
        }
        Commands::RestartArgs { first, params } => {
            handlers::params::restart_args(&StartupParams::from_args(params), first);
        }
        Commands::Paths { json } => {
            let ctx = bootstrap(&config)?;
            handlers::paths::execute(&ctx, json)?;
            ctx.mark_clean_shutdown();
        }
        Commands::Migrate { file, dir, pattern } => {
            let ctx = bootstrap(&config)?;
            match (file, dir, pattern) {
                (Some(file), _, _) => handlers::migrate::file(&ctx, &file)?,
                (None, Some(dir), Some(pattern)) => handlers::migrate::dir(&ctx, &dir, &pattern)?,
                _ => {
                    return Err(CliError::Arguments(
                        "give a file or --dir with --pattern".into(),
                    ));
                }
            }
            ctx.mark_clean_shutdown();
        }
    }

    Ok(())
}

fn main() {
    // Load environment variables before parsing so `.env` can supply APPHOME_CONFIG_DIR
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
