use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Snapshot of the local node and every peer it can see.
///
/// Mirrors the JSON served by the status API. Unknown fields are ignored so
/// newer API versions keep deserializing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    /// The node this process runs on.
    #[serde(default, rename = "Self")]
    pub self_peer: Option<PeerStatus>,

    /// All other peers, keyed by node key.
    ///
    /// Ordered by key, so iteration order is stable across polls.
    #[serde(default, rename = "Peer", deserialize_with = "null_as_default")]
    pub peer: BTreeMap<String, PeerStatus>,
}

impl Status {
    /// Iterate over the peers in ascending node-key order.
    pub fn peers(&self) -> impl Iterator<Item = &PeerStatus> {
        self.peer.values()
    }
}

/// One peer descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerStatus {
    /// Fully-qualified source name (e.g. `host.example.ts.net.`); may be empty
    #[serde(default, rename = "DNSName")]
    pub dns_name: String,

    /// Raw addresses, mixed families, possibly unparsable
    #[serde(default, rename = "TailscaleIPs", deserialize_with = "null_as_default")]
    pub addresses: Vec<String>,

    /// ACL tags, usually of the form `tag:<name>`
    #[serde(default, rename = "Tags")]
    pub tags: Option<Vec<String>>,
}

impl PeerStatus {
    /// Tags on this peer; empty when the API sent none.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Nil maps and slices arrive as `null`; read them as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
