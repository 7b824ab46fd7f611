//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Authoritative DNS for the peers of a private network
///
/// Polls the local node's status API and answers for every named peer
/// under the configured default zone, plus extra zones chosen by ACL tag.
#[derive(Parser, Debug)]
#[command(name = "tailzone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file
    #[arg(
        short,
        long,
        env = "TAILZONE_CONFIG",
        default_value = "/etc/tailzone/tailzone.toml",
        global = true
    )]
    pub config: PathBuf,

    /// Status API URL (overrides the config file)
    #[arg(long, env = "TAILZONE_STATUS_URL", global = true)]
    pub status_url: Option<String>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve DNS until interrupted
    Serve(ServeArgs),

    /// Validate the config file and list the zones it serves
    Check,

    /// Fetch peer status once and print the assembled records
    Dump,
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Listen address for UDP and TCP (overrides the config file)
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,
}
