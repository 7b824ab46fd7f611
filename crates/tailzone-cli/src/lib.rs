//! # tailzone-cli
//!
//! The `tailzone` binary: loads a TOML config, polls the peer status API
//! and serves the resulting zones over UDP and TCP.
//!
//! - `tailzone serve`: run the server (default)
//! - `tailzone check`: validate the config and list served zones
//! - `tailzone dump`: fetch status once and print the records it yields

pub mod cli;

pub use cli::run;
