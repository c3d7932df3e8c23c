//! Hospital LOS Prediction API - Main Entry Point

use api::{init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Hospital LOS Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load()?;
    info!(bind_addr = %settings.bind_addr, assets_dir = %settings.assets_dir, "starting");

    run_server(&settings).await?;

    Ok(())
}
