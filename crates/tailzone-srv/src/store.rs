//! Snapshot store: the current name index and the serial it was built under.
//!
//! The refresh loop is the only writer. Index and serial are swapped
//! together under the write lock, so a reader never sees one without the
//! other. Assembly happens before the lock is taken.

use chrono::{DateTime, Utc};
use rustc_hash::FxHasher;
use std::hash::Hasher;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::error;

use crate::authority::zone_builder::{NameIndex, PeerRecord};

/// One published refresh result.
#[derive(Debug)]
struct Snapshot {
    index: NameIndex,
    serial: u32,
}

/// Result of a lookup: the record (if any) and the serial it is valid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub record: Option<Arc<PeerRecord>>,
    pub serial: u32,
}

/// Holds the current snapshot for concurrent readers.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `index` under a serial derived from the current time.
    pub fn publish(&self, index: NameIndex) -> u32 {
        self.publish_with_serial(index, serial_at(Utc::now()))
    }

    /// Publish `index` under an explicit serial. Zero is bumped to one so a
    /// published snapshot always counts as ready.
    pub fn publish_with_serial(&self, index: NameIndex, serial: u32) -> u32 {
        let serial = serial.max(1);
        *self.write() = Some(Snapshot { index, serial });
        serial
    }

    /// Look up a canonical name in the current snapshot.
    ///
    /// `None` means nothing has been published yet (or the store was
    /// cleared). A name that is simply absent gives a [`Lookup`] with no
    /// record.
    pub fn read(&self, name: &str) -> Option<Lookup> {
        let guard = self.read_guard();
        let snapshot = guard.as_ref()?;
        Some(Lookup {
            record: snapshot.index.get(name).cloned(),
            serial: snapshot.serial,
        })
    }

    /// Serial of the current snapshot, if any.
    pub fn serial(&self) -> Option<u32> {
        self.read_guard().as_ref().map(|s| s.serial)
    }

    /// Number of entries in the current snapshot.
    pub fn len(&self) -> usize {
        self.read_guard().as_ref().map_or(0, |s| s.index.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once a snapshot with a non-zero serial is published.
    pub fn is_ready(&self) -> bool {
        self.read_guard().as_ref().is_some_and(|s| s.serial > 0)
    }

    /// Drop the current snapshot; the store reports not ready afterwards.
    pub fn clear(&self) {
        *self.write() = None;
    }

    // A panic while the lock was held cannot leave a half-written snapshot
    // (writes are a single assignment), so poisoning is logged and ignored.
    fn read_guard(&self) -> RwLockReadGuard<'_, Option<Snapshot>> {
        self.current.read().unwrap_or_else(|poisoned| {
            error!("snapshot lock poisoned; continuing with last snapshot");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Snapshot>> {
        self.current.write().unwrap_or_else(|poisoned| {
            error!("snapshot lock poisoned; replacing snapshot");
            poisoned.into_inner()
        })
    }
}

/// Zone serial for a refresh at `when`: a hash of the Unix timestamp.
///
/// Never zero.
pub fn serial_at(when: DateTime<Utc>) -> u32 {
    let mut hasher = FxHasher::default();
    hasher.write_i64(when.timestamp());
    let hash = hasher.finish();
    #[allow(clippy::cast_possible_truncation)]
    let folded = (hash ^ (hash >> 32)) as u32;
    folded.max(1)
}
