//! HTTP client for the peer status API.
//!
//! This crate provides [`StatusClient`], the production implementation of
//! [`StatusSource`], which the DNS engine polls for the current peer list.

mod client;
mod source;

pub use client::{StatusClient, StatusClientBuilder, DEFAULT_STATUS_URL};
pub use source::StatusSource;
pub use tailzone_core::{PeerStatus, Result, Status, StatusError};
