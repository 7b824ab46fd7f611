//! `tailzone serve`

use anyhow::Result;
use tailzone_srv::{server, Engine, ServerConfig};
use tracing::info;

use super::status_client;
use crate::cli::args::ServeArgs;

pub async fn execute(mut config: ServerConfig, args: ServeArgs) -> Result<()> {
    if let Some(listen) = args.listen {
        config.listen = listen;
    }

    let client = status_client(&config)?;
    info!(url = %client.url(), "polling peer status");

    let engine = Engine::new(config.engine_config()?, client)?;
    server::run(&config, &engine, server::shutdown_signal()).await?;

    info!("stopped");
    Ok(())
}
