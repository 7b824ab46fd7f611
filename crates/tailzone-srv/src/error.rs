//! Error types for the tailzone DNS engine.

use thiserror::Error;

/// Errors that can occur in tailzone-srv operations.
#[derive(Error, Debug)]
pub enum SrvError {
    /// Configuration is invalid or missing required fields.
    #[error("config error: {0}")]
    Config(String),

    /// DNS server failed to bind or start.
    #[error("dns server error: {0}")]
    Server(String),

    /// A zone or record name could not be built.
    #[error("zone error: {0}")]
    Zone(String),

    /// Fetching peer status failed.
    #[error("peer status unavailable: {0}")]
    Status(#[from] tailzone_core::StatusError),

    /// DNS name or record construction failed.
    #[error("dns protocol error: {0}")]
    Proto(#[from] hickory_proto::ProtoError),

    /// Config file could not be parsed.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
