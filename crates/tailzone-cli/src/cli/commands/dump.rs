//! `tailzone dump`

use anyhow::Result;
use tailzone_srv::authority::zone_builder;
use tailzone_srv::authority::zones::ZoneSet;
use tailzone_srv::ServerConfig;

use super::status_client;

pub async fn execute(config: &ServerConfig) -> Result<()> {
    let engine_config = config.engine_config()?;
    let zones = ZoneSet::from_config(&engine_config)?;

    let status = status_client(config)?.fetch().await?;
    let index = zone_builder::assemble_status(&engine_config, &zones, &status)?;

    println!("{index}");
    Ok(())
}
