//! Zone index: the set of zone apexes this engine is authoritative for.
//!
//! Derived once from [`Config`] and never touched by refreshes, so the
//! "is this ours" decision needs no lock.

use hickory_proto::rr::Name;
use rustc_hash::FxHashMap;

use crate::authority::names::{self, parse_name};
use crate::config::Config;

/// Label of the synthetic nameserver host inside every zone.
pub const NS_LABEL: &str = "ns";

/// Label prefixed to the nameserver name to form the SOA mailbox.
pub const MBOX_LABEL: &str = "root";

/// Pre-built names for one served zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneNames {
    /// The zone apex.
    pub apex: Name,
    /// `ns.<zone>.`
    pub ns: Name,
    /// `root.ns.<zone>.`
    pub mbox: Name,
}

impl ZoneNames {
    fn for_zone(zone: &str) -> crate::Result<Self> {
        let apex = parse_name(zone)?;
        let ns = apex.prepend_label(NS_LABEL)?;
        let mbox = ns.prepend_label(MBOX_LABEL)?;
        Ok(Self { apex, ns, mbox })
    }
}

/// Zones served by this engine, keyed by canonical name.
#[derive(Debug, Clone, Default)]
pub struct ZoneSet {
    zones: FxHashMap<String, ZoneNames>,
}

impl ZoneSet {
    /// Default zone plus every zone reachable through a tag mapping.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        if config.default_zone.is_empty() {
            return Err(crate::SrvError::Config(
                "no default zone configured".to_string(),
            ));
        }

        let mut zones = FxHashMap::default();
        for zone in std::iter::once(&config.default_zone).chain(config.zones_by_tag.values()) {
            let key = names::canonical_name(zone);
            if key.is_empty() || zones.contains_key(&key) {
                continue;
            }
            let built = ZoneNames::for_zone(&key)?;
            zones.insert(key, built);
        }

        Ok(Self { zones })
    }

    /// Whether `name` (canonical) is a zone apex we own.
    pub fn contains(&self, name: &str) -> bool {
        self.zones.contains_key(name)
    }

    /// Names for the zone apex `name`, if we own it.
    pub fn get(&self, name: &str) -> Option<&ZoneNames> {
        self.zones.get(name)
    }

    /// Whether `name` is an apex we own or sits directly below one.
    pub fn owns(&self, name: &str) -> bool {
        self.contains(name) || names::zone_of(name).is_some_and(|zone| self.contains(zone))
    }

    /// Canonical zone names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.zones.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new("corp.example.com.")
            .with_tag("prod", "example.com.")
            .with_tag("tag:lab", "lab.example.com")
            .with_tag("also-prod", "Example.com.")
    }

    #[test]
    fn test_zones_from_config() {
        let zones = ZoneSet::from_config(&config()).unwrap();
        assert_eq!(
            zones.names(),
            vec!["corp.example.com.", "example.com.", "lab.example.com."]
        );
        assert_eq!(zones.len(), 3);
    }

    #[test]
    fn test_zone_names() {
        let zones = ZoneSet::from_config(&config()).unwrap();
        let names = zones.get("example.com.").unwrap();
        assert_eq!(names.apex.to_string(), "example.com.");
        assert_eq!(names.ns.to_string(), "ns.example.com.");
        assert_eq!(names.mbox.to_string(), "root.ns.example.com.");
    }

    #[test]
    fn test_owns() {
        let zones = ZoneSet::from_config(&config()).unwrap();
        assert!(zones.owns("corp.example.com."));
        assert!(zones.owns("foo.corp.example.com."));
        assert!(zones.owns("bar.example.com."));
        assert!(!zones.owns("a.foo.lab.example.com."));
        assert!(!zones.owns("foo.other.net."));
        assert!(!zones.owns("com."));
    }

    #[test]
    fn test_empty_default_zone_rejected() {
        assert!(matches!(
            ZoneSet::from_config(&Config::new("")),
            Err(crate::SrvError::Config(_))
        ));
    }
}
