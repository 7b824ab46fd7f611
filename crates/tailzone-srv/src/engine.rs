//! The engine: zones, snapshot store, resolver and refresh loop wired
//! together behind `ready` / `resolve` / `start` / stop.

use hickory_proto::rr::{DNSClass, Name, RecordType};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tailzone_client::StatusSource;
use tracing::{info, warn};

use crate::authority::zones::ZoneSet;
use crate::config::{effective_interval, Config};
use crate::resolver::{Resolver, Response};
use crate::store::SnapshotStore;
use crate::sync::refresh::{RefreshHandle, Refresher};

/// Authoritative engine for one set of peer zones.
///
/// Configuration is fixed at construction. Queries can be resolved at any
/// time but are declined until [`start`](Self::start) has published the
/// first snapshot.
pub struct Engine<S> {
    config: Arc<Config>,
    zones: Arc<ZoneSet>,
    store: Arc<SnapshotStore>,
    source: Arc<S>,
    resolver: Resolver,
    started: AtomicBool,
}

impl<S: StatusSource + 'static> Engine<S> {
    /// Build an engine. Fails when no default zone is configured.
    ///
    /// A zero refresh interval runs at
    /// [`DEFAULT_RELOAD_INTERVAL`](crate::config::DEFAULT_RELOAD_INTERVAL).
    pub fn new(mut config: Config, source: S) -> crate::Result<Self> {
        let interval = effective_interval(config.refresh_interval);
        if interval != config.refresh_interval {
            warn!(
                requested = ?config.refresh_interval,
                interval_secs = interval.as_secs(),
                "refresh interval out of range; adjusted"
            );
            config.refresh_interval = interval;
        }

        let zones = Arc::new(ZoneSet::from_config(&config)?);
        let store = Arc::new(SnapshotStore::new());
        let resolver = Resolver::new(Arc::clone(&zones), Arc::clone(&store), config.ttl_secs());

        info!(
            zones = ?zones.names(),
            refresh_secs = config.refresh_interval.as_secs(),
            "engine configured"
        );

        Ok(Self {
            config: Arc::new(config),
            zones,
            store,
            source: Arc::new(source),
            resolver,
            started: AtomicBool::new(false),
        })
    }

    /// Refresh once, then keep refreshing in the background.
    ///
    /// A failed first refresh is logged; the engine stays not ready until a
    /// later cycle succeeds. Can only be called once per engine.
    pub async fn start(&self) -> crate::Result<RefreshHandle> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(crate::SrvError::Server(
                "refresh loop already started".to_string(),
            ));
        }

        let refresher = Refresher::new(
            Arc::clone(&self.config),
            Arc::clone(&self.zones),
            Arc::clone(&self.source),
            Arc::clone(&self.store),
        );

        if refresher.refresh().await.is_none() {
            warn!("initial refresh failed; not ready until the next successful poll");
        }

        Ok(refresher.spawn(self.config.refresh_interval))
    }

    /// True once a snapshot is published and the loop has not been stopped.
    pub fn ready(&self) -> bool {
        self.resolver.ready()
    }

    /// Resolve one question. See [`Resolver::resolve`].
    pub fn resolve(&self, name: &Name, query_type: RecordType, query_class: DNSClass) -> Response {
        self.resolver.resolve(name, query_type, query_class)
    }

    /// A resolver sharing this engine's store, for the request handler.
    pub fn resolver(&self) -> Resolver {
        self.resolver.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }
}
