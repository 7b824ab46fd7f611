//! Command implementations.

pub mod check;
pub mod dump;
pub mod serve;

use anyhow::Result;
use tailzone_client::StatusClient;
use tailzone_srv::ServerConfig;

/// Status client for the configured endpoint.
pub fn status_client(config: &ServerConfig) -> Result<StatusClient> {
    Ok(StatusClient::builder()
        .url(config.status_url.clone())
        .timeout(config.status_timeout())
        .build()?)
}
