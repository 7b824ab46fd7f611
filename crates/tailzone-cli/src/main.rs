//! tailzone - authoritative DNS for private network peers

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tailzone_cli::run().await
}
