//! Nutribiome Web Server
//!
//! Run with: cargo run -p nutribiome-web

use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nutribiome_web::{config::Config, router::build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Nutribiome dashboard...");

    let config = Config::load()?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // No partial dashboard: a table that fails to load halts startup.
    let state = match AppState::load(config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Error loading OTU data: {}", e);
            return Err(e.into());
        }
    };

    let app = build_router(state);

    info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
