//! Background refresh loop.
//!
//! One task per engine. Each tick fetches peer status, assembles a fresh
//! index and publishes it. A failed fetch leaves the previous snapshot in
//! place; stale answers beat no answers.

use std::sync::Arc;
use std::time::Duration;
use tailzone_client::StatusSource;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::authority::zone_builder;
use crate::authority::zones::ZoneSet;
use crate::config::{effective_interval, Config};
use crate::store::SnapshotStore;

/// Runs refresh cycles against one store.
pub struct Refresher<S> {
    config: Arc<Config>,
    zones: Arc<ZoneSet>,
    source: S,
    store: Arc<SnapshotStore>,
}

impl<S: StatusSource> Refresher<S> {
    pub fn new(
        config: Arc<Config>,
        zones: Arc<ZoneSet>,
        source: S,
        store: Arc<SnapshotStore>,
    ) -> Self {
        Self {
            config,
            zones,
            source,
            store,
        }
    }

    /// Run one cycle: fetch, assemble, publish. Returns the new serial.
    ///
    /// Nothing is published on error.
    pub async fn refresh_once(&self) -> crate::Result<u32> {
        debug!("assembling records for peers");
        let status = self.source.status().await?;

        let index = zone_builder::assemble_status(&self.config, &self.zones, &status)?;
        let entries = index.len();
        debug!("assembled records:\n{index}");

        let serial = self.store.publish(index);
        info!(entries, serial, "published peer records");
        Ok(serial)
    }

    /// [`refresh_once`](Self::refresh_once), logging instead of failing.
    ///
    /// Transient status failures log at warn; anything the next poll will
    /// not fix on its own logs at error.
    pub async fn refresh(&self) -> Option<u32> {
        match self.refresh_once().await {
            Ok(serial) => Some(serial),
            Err(crate::SrvError::Status(e)) if e.is_transient() => {
                warn!(error = %e, code = ?e.status_code(), "refresh failed; keeping previous snapshot");
                None
            }
            Err(e) => {
                let code = match &e {
                    crate::SrvError::Status(status) => status.status_code(),
                    _ => None,
                };
                error!(error = %e, code = ?code, "refresh failed; keeping previous snapshot");
                None
            }
        }
    }
}

impl<S: StatusSource + 'static> Refresher<S> {
    /// Spawn the periodic loop. The first tick fires one full `period`
    /// from now; run [`refresh`](Self::refresh) first if an immediate
    /// snapshot is needed. A zero `period` runs at the default interval.
    pub fn spawn(self, period: Duration) -> RefreshHandle {
        let period = effective_interval(period);
        let cancel = CancellationToken::new();
        let store = Arc::clone(&self.store);
        let task = tokio::spawn(run_refresh_loop(self, period, cancel.clone()));

        RefreshHandle {
            cancel,
            task,
            store,
        }
    }
}

async fn run_refresh_loop<S: StatusSource>(
    refresher: Refresher<S>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;

    info!(interval_secs = period.as_secs(), "polling started");

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!("polling stopped");
                break;
            }
            _ = ticker.tick() => {
                refresher.refresh().await;
            }
        }
    }
}

/// Handle to a running refresh loop.
///
/// [`stop`](Self::stop) consumes the handle, so the loop can be stopped at
/// most once. Dropping the handle without stopping leaves the loop running.
#[derive(Debug)]
pub struct RefreshHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
    store: Arc<SnapshotStore>,
}

impl RefreshHandle {
    /// Stop polling, wait for the loop to exit and clear the store.
    ///
    /// A cycle already in flight finishes first; nothing is published after
    /// this returns.
    pub async fn stop(self) {
        debug!("shutting down refresh loop");
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "refresh task ended abnormally");
        }
        self.store.clear();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_status, FakeSource};
    use tailzone_core::StatusError;

    fn refresher(source: Arc<FakeSource>) -> (Refresher<Arc<FakeSource>>, Arc<SnapshotStore>) {
        let config = Arc::new(Config::new("corp.example.com.").with_tag("prod", "example.com."));
        let zones = Arc::new(ZoneSet::from_config(&config).unwrap());
        let store = Arc::new(SnapshotStore::new());
        (
            Refresher::new(config, zones, source, Arc::clone(&store)),
            store,
        )
    }

    #[tokio::test]
    async fn test_refresh_once_publishes() {
        let source = Arc::new(FakeSource::new(vec![Ok(sample_status())]));
        let (refresher, store) = refresher(Arc::clone(&source));

        let serial = refresher.refresh_once().await.unwrap();
        assert!(store.is_ready());
        assert_eq!(store.serial(), Some(serial));
        assert!(store.read("foo.example.com.").unwrap().record.is_some());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_previous_snapshot() {
        let source = Arc::new(FakeSource::new(vec![
            Ok(sample_status()),
            Err(StatusError::Connection("refused".into())),
        ]));
        let (refresher, store) = refresher(source);

        let serial = refresher.refresh().await.unwrap();
        assert_eq!(refresher.refresh().await, None);
        assert_eq!(store.serial(), Some(serial));
        assert!(store.read("foo.corp.example.com.").unwrap().record.is_some());
    }

    #[tokio::test]
    async fn test_fetch_error_before_first_publish_stays_unready() {
        let source = Arc::new(FakeSource::new(vec![Err(StatusError::Timeout("10s".into()))]));
        let (refresher, store) = refresher(source);

        assert!(matches!(
            refresher.refresh_once().await,
            Err(crate::SrvError::Status(_))
        ));
        assert!(!store.is_ready());
    }

    #[tokio::test]
    async fn test_permanent_error_keeps_previous_snapshot() {
        let source = Arc::new(FakeSource::new(vec![
            Ok(sample_status()),
            Err(StatusError::Api {
                code: 403,
                message: "forbidden".into(),
            }),
        ]));
        let (refresher, store) = refresher(source);

        let serial = refresher.refresh().await.unwrap();
        assert_eq!(refresher.refresh().await, None);
        assert_eq!(store.serial(), Some(serial));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_does_not_kill_loop() {
        let source = Arc::new(FakeSource::repeating(sample_status()));
        let (refresher, store) = refresher(Arc::clone(&source));
        let handle = refresher.spawn(Duration::ZERO);

        tokio::time::sleep(Duration::from_secs(301)).await;
        assert!(!handle.is_finished());
        assert_eq!(source.calls(), 1);
        assert!(store.is_ready());

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_ticks_and_stops() {
        let source = Arc::new(FakeSource::repeating(sample_status()));
        let (refresher, store) = refresher(Arc::clone(&source));
        let handle = refresher.spawn(Duration::from_secs(300));

        // Nothing runs before the first full interval.
        tokio::time::sleep(Duration::from_secs(299)).await;
        assert_eq!(source.calls(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(source.calls(), 1);
        assert!(store.is_ready());

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(source.calls(), 2);

        handle.stop().await;
        assert!(!store.is_ready());

        tokio::time::sleep(Duration::from_secs(900)).await;
        assert_eq!(source.calls(), 2);
        assert!(!store.is_ready());
    }
}
