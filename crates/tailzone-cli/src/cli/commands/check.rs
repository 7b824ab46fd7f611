//! `tailzone check`

use anyhow::Result;
use tailzone_srv::authority::zones::ZoneSet;
use tailzone_srv::ServerConfig;

pub fn execute(config: &ServerConfig) -> Result<()> {
    let engine_config = config.engine_config()?;
    let zones = ZoneSet::from_config(&engine_config)?;

    println!("listen:   {}", config.listen);
    println!("status:   {}", config.status_url);
    println!("refresh:  {}s", engine_config.refresh_interval.as_secs());
    println!("default:  {}", engine_config.default_zone);
    for (tag, zone) in &engine_config.zones_by_tag {
        println!("tag:{tag} -> {zone}");
    }
    println!("zones:    {}", zones.names().join(" "));

    Ok(())
}
