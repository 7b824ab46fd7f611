//! The peer source seam.

use async_trait::async_trait;
use std::sync::Arc;
use tailzone_core::{Result, Status};

/// Anything that can produce the current peer status.
///
/// The refresh loop only needs this one call, so tests can stand in a fixed
/// snapshot instead of a live API.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the current status: the local node plus every visible peer.
    async fn status(&self) -> Result<Status>;
}

#[async_trait]
impl<T: StatusSource + ?Sized> StatusSource for Arc<T> {
    async fn status(&self) -> Result<Status> {
        (**self).status().await
    }
}
