// API Server Binary Entry Point
//
// Purpose: Start the Axum advisory API
// Usage: cargo run --features api --bin api_server

use agro_advisor::{create_router, AppState, EngineConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "agro_advisor=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from CONFIG_PATH / DATA_DIR / MODEL_PATH / DEFAULT_LANGUAGE
    let config = EngineConfig::from_env()?;

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    let seed: Option<u64> = std::env::var("SIMULATION_SEED")
        .ok()
        .and_then(|s| s.parse().ok());

    tracing::info!("Configuration:");
    tracing::info!("  DATA_DIR: {:?}", config.data_dir);
    tracing::info!("  MODEL_PATH: {:?}", config.model_path);
    tracing::info!("  DEFAULT_LANGUAGE: {}", config.default_language);
    tracing::info!("  PORT: {}", port);

    let state = AppState::from_config(&config, seed)?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
