//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::{Context as _, Result};
use args::{Cli, Commands};
use clap::Parser;
use tailzone_srv::ServerConfig;
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let mut config = ServerConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(url) = cli.status_url {
        config.status_url = url;
    }

    match cli.command.unwrap_or(Commands::Serve(args::ServeArgs::default())) {
        Commands::Serve(args) => commands::serve::execute(config, args).await,
        Commands::Check => commands::check::execute(&config),
        Commands::Dump => commands::dump::execute(&config).await,
    }
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
