pub mod api;
pub mod config;
pub mod db;
pub mod extraction;
pub mod models;
pub mod schedule;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::extraction::{GeminiClient, UnconfiguredVisionClient, VisionClient};

/// Run the service: initialize logging, migrate the database, and serve
/// the API until Ctrl-C.
pub async fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let data_dir = config::app_data_dir();
    std::fs::create_dir_all(&data_dir)
        .map_err(|e| format!("Failed to create data directory: {e}"))?;

    // Open once up front so migrations run before the first request.
    let db_path = config::database_path();
    db::open_database(&db_path).map_err(|e| format!("Failed to open database: {e}"))?;

    let vision: Arc<dyn VisionClient + Send + Sync> = match GeminiClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::warn!("{e}; prescription analysis will be unavailable");
            Arc::new(UnconfiguredVisionClient)
        }
    };

    let ctx = api::ApiContext::new(db_path, vision);
    let addr = SocketAddr::from(([0, 0, 0, 0], config::server_port()));
    let mut server = api::start_server(ctx, addr).await?;

    tracing::info!("Listening on http://{}", server.addr);

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for shutdown signal: {e}"))?;
    tracing::info!("Shutting down");
    server.shutdown();

    Ok(())
}
