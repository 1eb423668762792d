//! Routing engine server binary

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use georoute_config::load_settings;
use georoute_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional settings file: first CLI argument or GEOROUTE_CONFIG
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("GEOROUTE_CONFIG").ok());

    let settings = load_settings(config_path.as_deref()).context("loading settings")?;
    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    // A broken domain configuration must abort startup
    let state = AppState::from_settings(settings).context("initializing routing engine")?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "routing engine listening");

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
