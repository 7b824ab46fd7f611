//! Test helpers shared across modules.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tailzone_client::StatusSource;
use tailzone_core::{PeerStatus, Result, Status};

pub fn peer(name: &str, addrs: &[&str], tags: &[&str]) -> PeerStatus {
    PeerStatus {
        dns_name: name.to_string(),
        addresses: addrs.iter().map(ToString::to_string).collect(),
        tags: if tags.is_empty() {
            None
        } else {
            Some(tags.iter().map(ToString::to_string).collect())
        },
    }
}

/// Node `gw.ts.net.` plus peer `foo.ts.net.` tagged `prod`.
pub fn sample_status() -> Status {
    let mut status = Status {
        self_peer: Some(peer("gw.ts.net.", &["100.64.0.1", "fd7a::1"], &[])),
        ..Default::default()
    };
    status.peer.insert(
        "nodekey:01".into(),
        peer("foo.ts.net.", &["100.1.2.3", "fd7a::abcd"], &["tag:prod"]),
    );
    status
}

/// Scripted status source. Replays queued results, then returns the
/// repeating status if one was given, or a connection error otherwise.
pub struct FakeSource {
    queue: Mutex<VecDeque<Result<Status>>>,
    repeat: Option<Status>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(results: Vec<Result<Status>>) -> Self {
        Self {
            queue: Mutex::new(results.into()),
            repeat: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn repeating(status: Status) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            repeat: Some(status),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for FakeSource {
    async fn status(&self) -> Result<Status> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.queue.lock().unwrap().pop_front() {
            return next;
        }
        self.repeat.clone().ok_or_else(|| {
            tailzone_core::StatusError::Connection("fake source exhausted".into())
        })
    }
}
