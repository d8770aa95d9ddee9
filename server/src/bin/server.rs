//! Merge server binary.
//!
//! Loads configuration and serves the merge API until Ctrl+C.

use tracing_subscriber::EnvFilter;

use merge_server_lib::app::SharedState;
use merge_server_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting merge server");

    let config = merge_server_lib::init_foundation();
    let state = SharedState::new(config);

    server::start_server(state).await?;

    tracing::info!("Merge server stopped");
    Ok(())
}
