pub mod app;
pub mod config;
pub mod server;

use config::AppConfig;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load .env and build the runtime config.
pub fn init_foundation() -> AppConfig {
    load_dotenv();

    let config = AppConfig::from_env();
    tracing::info!(
        port = config.server_port,
        concurrency = config.merge_concurrency,
        max_upload_bytes = config.max_upload_bytes,
        canvas_limits = %config.canvas_limits(),
        "Configuration loaded"
    );
    if config.merge_concurrency > 1 {
        tracing::warn!(
            "MERGE_CONCURRENCY={} raises peak memory proportionally to concurrent merges",
            config.merge_concurrency
        );
    }

    config
}
