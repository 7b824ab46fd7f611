//! Keeping the snapshot current.
//!
//! - **Refresh**: polls the peer source on a timer, rebuilds the index and
//!   publishes it to the snapshot store.

pub mod refresh;
