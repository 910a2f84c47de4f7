use emigrant_api::{app, AppState};
use emigrant_forecast::registry::ModelRegistry;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emigrant_api=info,tower_http=info".into()),
        )
        .init();

    // Model bundles are loaded once and shared read-only for the life of
    // the process.
    let model_dir = PathBuf::from(env::var("MODEL_DIR").unwrap_or_else(|_| "public".to_string()));
    let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| ".".to_string()));

    let registry = ModelRegistry::load(&model_dir)?;
    tracing::info!("Loaded model bundles from {}", model_dir.display());

    let state = AppState {
        registry: Arc::new(registry),
        data_dir,
    };

    // Server configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT").unwrap_or_else(|_| "5001".to_string()).parse()?;
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!(
        "emigrant_api v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
