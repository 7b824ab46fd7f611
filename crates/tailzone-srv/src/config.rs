//! Server configuration for tailzone nodes.
//!
//! [`ServerConfig`] is what the operator writes (TOML). [`Config`] is the
//! validated, canonical form the engine is built from; it never changes
//! after construction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use crate::authority::names::canonical_name;

/// Refresh cadence used when none is configured.
pub const DEFAULT_RELOAD_INTERVAL: Duration = Duration::from_secs(300);

/// Shortest cadence the refresh loop runs at. Also the smallest TTL served.
pub const MIN_RELOAD_INTERVAL: Duration = Duration::from_secs(1);

/// Prefix the status API puts in front of ACL tags.
pub const TAG_PREFIX: &str = "tag:";

/// Configuration file for a tailzone node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// UDP/TCP listen address (default: 127.0.0.1:5353).
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Zone every named peer is published under. Required.
    #[serde(default)]
    pub default_zone: String,

    /// How often to poll peer status (seconds). Also the record TTL.
    #[serde(default = "default_reload_interval")]
    pub reload_interval_secs: u64,

    /// Status API endpoint.
    #[serde(default = "default_status_url")]
    pub status_url: String,

    /// Timeout for one status request (seconds).
    #[serde(default = "default_status_timeout")]
    pub status_timeout_secs: u64,

    /// Extra zones keyed by ACL tag, with or without the `tag:` prefix.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            default_zone: String::new(),
            reload_interval_secs: default_reload_interval(),
            status_url: default_status_url(),
            status_timeout_secs: default_status_timeout(),
            tags: BTreeMap::new(),
        }
    }
}

impl ServerConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::SrvError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything the engine relies on.
    pub fn validate(&self) -> crate::Result<()> {
        if canonical_name(&self.default_zone).is_empty() {
            return Err(crate::SrvError::Config(
                "default_zone is required".to_string(),
            ));
        }
        if self.reload_interval_secs == 0 {
            return Err(crate::SrvError::Config(
                "reload_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.status_timeout_secs == 0 {
            return Err(crate::SrvError::Config(
                "status_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if u32::try_from(self.reload_interval_secs).is_err() {
            return Err(crate::SrvError::Config(format!(
                "reload_interval_secs {} does not fit a DNS TTL",
                self.reload_interval_secs
            )));
        }

        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for (raw_tag, zone) in &self.tags {
            let tag = strip_tag_prefix(raw_tag);
            if tag.is_empty() {
                return Err(crate::SrvError::Config(format!(
                    "empty tag name in [tags] ({raw_tag:?})"
                )));
            }
            if canonical_name(zone).is_empty() {
                return Err(crate::SrvError::Config(format!(
                    "tag {tag:?} maps to an empty zone"
                )));
            }
            if let Some(previous) = seen.insert(tag, raw_tag) {
                return Err(crate::SrvError::Config(format!(
                    "tag {tag:?} configured twice ({previous:?} and {raw_tag:?})"
                )));
            }
        }

        Ok(())
    }

    /// Build the engine config from this file.
    pub fn engine_config(&self) -> crate::Result<Config> {
        self.validate()?;
        let config = self.tags.iter().fold(
            Config::new(&self.default_zone)
                .with_refresh_interval(Duration::from_secs(self.reload_interval_secs)),
            |config, (tag, zone)| config.with_tag(tag, zone),
        );
        Ok(config)
    }

    /// Status request timeout as a duration.
    pub const fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }
}

/// Engine configuration: zones and refresh cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Canonical default zone.
    pub default_zone: String,
    /// Canonical zone per tag; tags are stored without the `tag:` prefix.
    pub zones_by_tag: BTreeMap<String, String>,
    /// Poll cadence and record TTL.
    pub refresh_interval: Duration,
}

impl Config {
    /// Config serving only `default_zone` with the default interval.
    pub fn new(default_zone: &str) -> Self {
        Self {
            default_zone: canonical_name(default_zone),
            zones_by_tag: BTreeMap::new(),
            refresh_interval: DEFAULT_RELOAD_INTERVAL,
        }
    }

    /// Map peers tagged `tag` into `zone` as well.
    #[must_use]
    pub fn with_tag(mut self, tag: &str, zone: &str) -> Self {
        self.zones_by_tag
            .insert(strip_tag_prefix(tag).to_string(), canonical_name(zone));
        self
    }

    /// Set the poll cadence. Zero falls back to [`DEFAULT_RELOAD_INTERVAL`];
    /// anything shorter than a second is raised to one second.
    #[must_use]
    pub const fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = effective_interval(interval);
        self
    }

    /// Zone configured for a peer tag, if any. Accepts `tag:name` or `name`.
    pub fn zone_for_tag(&self, tag: &str) -> Option<&str> {
        self.zones_by_tag
            .get(strip_tag_prefix(tag))
            .map(String::as_str)
            .filter(|zone| !zone.is_empty())
    }

    /// TTL for every synthesized record, in seconds.
    pub fn ttl_secs(&self) -> u32 {
        u32::try_from(effective_interval(self.refresh_interval).as_secs()).unwrap_or(u32::MAX)
    }
}

/// Interval the refresh loop actually runs at.
pub(crate) const fn effective_interval(interval: Duration) -> Duration {
    if interval.is_zero() {
        DEFAULT_RELOAD_INTERVAL
    } else if interval.as_secs() == 0 {
        MIN_RELOAD_INTERVAL
    } else {
        interval
    }
}

fn strip_tag_prefix(tag: &str) -> &str {
    tag.strip_prefix(TAG_PREFIX).unwrap_or(tag)
}

// Default value functions for serde.
const fn default_listen() -> SocketAddr {
    SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::LOCALHOST), 5353)
}

const fn default_reload_interval() -> u64 {
    DEFAULT_RELOAD_INTERVAL.as_secs()
}

fn default_status_url() -> String {
    tailzone_client::DEFAULT_STATUS_URL.to_string()
}

const fn default_status_timeout() -> u64 {
    10
}
