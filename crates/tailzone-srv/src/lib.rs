//! tailzone-srv: authoritative DNS for the peers of a private network.
//!
//! Peer metadata (source name, addresses, ACL tags) is polled from a status
//! API and turned into an in-memory name index, which is then served with
//! ordinary authoritative semantics: CNAME to the peer's own name plus its
//! A/AAAA records, NS and SOA at each zone apex, NXDOMAIN and no-data.
//!
//! # Zones
//!
//! Every named peer appears under the default zone. Peers carrying a tag
//! that is mapped to a zone additionally appear under that zone:
//!
//! ```text
//! default_zone = "corp.example.com."   [tags] prod = "example.com."
//!
//! foo.example.ts.net. (tag:prod)  ->  foo.corp.example.com.  CNAME foo.example.ts.net.
//!                                     foo.example.com.       CNAME foo.example.ts.net.
//! ```
//!
//! # Data flow
//!
//! ```text
//! StatusSource -> zone_builder::assemble -> SnapshotStore <- Resolver -> handler -> wire
//!                  (refresh loop writes)                    (queries read)
//! ```

pub mod authority;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod resolver;
pub mod server;
pub mod store;
pub mod sync;

#[cfg(test)]
mod testing;

// Re-exports for convenience.
pub use config::{Config, ServerConfig};
pub use engine::Engine;
pub use error::SrvError;
pub use handler::{PeerDnsHandler, ServFail};
pub use resolver::{Resolver, Response};
pub use store::SnapshotStore;
pub use sync::refresh::RefreshHandle;

/// Result type for tailzone-srv operations.
pub type Result<T> = std::result::Result<T, SrvError>;
