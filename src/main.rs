use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use mediscrape::api::router::{api_router, cors_layer};
use mediscrape::api::types::ApiContext;
use mediscrape::config::{self, Config};
use mediscrape::gemini::{GeminiClient, VisionModel};
use mediscrape::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    if let Err(e) = run().await {
        tracing::error!("Fatal: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    std::fs::create_dir_all(&config.data_dir)?;
    let db_path = config.data_dir.join("mediscrape.db");

    let vision: Arc<dyn VisionModel> = Arc::new(GeminiClient::from_config(&config));
    let state = Arc::new(AppState::new(db_path, vision)?);
    let ctx = ApiContext::new(state);

    let app = api_router(ctx).layer(cors_layer(config.allowed_origin.as_deref())?);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, model = %config.gemini_model, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
