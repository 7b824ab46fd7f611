//! Zone builder: converts a peer status snapshot into a name index.
//!
//! Every peer with a usable source name becomes one shared [`PeerRecord`],
//! indexed under `label.<default zone>` and under `label.<tag zone>` for
//! each mapped tag it carries. The node itself is processed last and also
//! answers for `ns.<zone>` in every served zone.

use hickory_proto::rr::Name;
use rustc_hash::FxHashMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use tailzone_core::{PeerStatus, Status};
use tracing::{debug, error, warn};

use crate::authority::addrs::bucket_addrs;
use crate::authority::names::{self, canonical_name, host_label, is_valid_label};
use crate::authority::zones::{ZoneSet, NS_LABEL};
use crate::config::Config;

/// One assembled peer. Immutable once built and shared between index keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    /// The peer's own fully-qualified name; every alias is a CNAME to it.
    pub canonical_name: Name,
    /// IPv4 addresses in status order.
    pub v4: Vec<Ipv4Addr>,
    /// IPv6 addresses in status order.
    pub v6: Vec<Ipv6Addr>,
}

impl fmt::Display for PeerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A: {:?} AAAA: {:?} CNAME: {}",
            self.v4, self.v6, self.canonical_name
        )
    }
}

/// Query name (canonical) to peer record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex(FxHashMap<String, Arc<PeerRecord>>);

impl NameIndex {
    /// Look up a canonical query name.
    pub fn get(&self, name: &str) -> Option<&Arc<PeerRecord>> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<PeerRecord>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    // Later inserts replace earlier ones.
    fn insert(&mut self, name: String, record: Arc<PeerRecord>) {
        if let Some(previous) = self.0.insert(name.clone(), record) {
            debug!(
                name = %name,
                replaced = %previous.canonical_name,
                "query name claimed by more than one peer"
            );
        }
    }
}

impl fmt::Display for NameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "records: [ ]");
        }
        let mut lines: Vec<String> = self
            .0
            .iter()
            .map(|(name, record)| format!("{name} => {record}"))
            .collect();
        lines.sort_unstable();
        write!(f, "records: [\n{}\n]", lines.join("\n"))
    }
}

/// Build the name index for one refresh cycle.
///
/// Fails only when no default zone is configured. Peers without a usable
/// source name are skipped. When two peers produce the same query name the
/// one processed later wins; `self_peer` is always processed last.
pub fn assemble<'a, I>(
    config: &Config,
    zones: &ZoneSet,
    self_peer: Option<&PeerStatus>,
    peers: I,
) -> crate::Result<NameIndex>
where
    I: IntoIterator<Item = &'a PeerStatus>,
{
    if config.default_zone.is_empty() {
        error!("no default zone configured; refusing to build records");
        return Err(crate::SrvError::Config(
            "no default zone configured".to_string(),
        ));
    }

    let mut index = NameIndex::default();
    for peer in peers {
        let _ = assemble_peer(config, peer, &mut index);
    }

    let Some(own) = self_peer.and_then(|me| assemble_peer(config, me, &mut index)) else {
        error!("no usable record for this node; NS and SOA answers will be degraded");
        return Ok(index);
    };

    for zone in zones.names() {
        index.insert(format!("{NS_LABEL}.{zone}"), Arc::clone(&own));
    }

    Ok(index)
}

/// [`assemble`] over a whole status response, peers in node-key order.
pub fn assemble_status(config: &Config, zones: &ZoneSet, status: &Status) -> crate::Result<NameIndex> {
    assemble(config, zones, status.self_peer.as_ref(), status.peers())
}

/// Insert every entry for one peer, returning its shared record.
fn assemble_peer(config: &Config, peer: &PeerStatus, index: &mut NameIndex) -> Option<Arc<PeerRecord>> {
    if peer.dns_name.trim().is_empty() {
        debug!("skipping peer without a DNS name");
        return None;
    }

    let source = canonical_name(&peer.dns_name);
    let Some(label) = host_label(&source) else {
        warn!(peer = %source, "failed to extract a host name from peer");
        return None;
    };
    if !is_valid_label(label) {
        warn!(peer = %source, label = %label, "peer host name is not a valid DNS label");
        return None;
    }
    let canonical = match names::parse_name(&source) {
        Ok(name) => name,
        Err(e) => {
            warn!(peer = %source, error = %e, "peer DNS name does not parse");
            return None;
        }
    };

    let (v4, v6) = bucket_addrs(&peer.addresses);
    let record = Arc::new(PeerRecord {
        canonical_name: canonical,
        v4,
        v6,
    });

    index.insert(format!("{label}.{}", config.default_zone), Arc::clone(&record));

    let tags = peer.tags();
    if tags.is_empty() {
        debug!(peer = %source, "peer has no tags");
    }
    for tag in tags {
        if let Some(zone) = config.zone_for_tag(tag) {
            index.insert(format!("{label}.{zone}"), Arc::clone(&record));
        }
    }

    Some(record)
}
