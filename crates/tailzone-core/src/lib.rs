//! Core types and errors shared by the tailzone crates.
//!
//! - **Types**: the peer-status snapshot returned by the status API
//! - **Errors**: [`StatusError`] for everything that can go wrong fetching it
//!
//! # Example
//!
//! ```rust,ignore
//! use tailzone_core::{Result, Status};
//!
//! fn count_named(status: &Status) -> Result<usize> {
//!     Ok(status.peers().filter(|p| !p.dns_name.is_empty()).count())
//! }
//! ```

mod error;
pub mod types;

pub use error::{Result, StatusError};
pub use types::*;
