mod api;
mod app;
mod config;
mod detection;
mod domain;
mod infrastructure;
mod registry;

use anyhow::Result;
use infrastructure::{directories, logging, shutdown};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let shutdown = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown.clone());

    let app = app::ScamGuardApp::initialize(config, shutdown)?;
    app.run().await
}
