// Expense Gateway - Web Server
// Proxies expense CRUD to the upstream API and serves the aggregate totals

use anyhow::{Context, Result};
use expense_gateway::{router, AppState, GatewayConfig, UpstreamClient, VERSION};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(version = VERSION, "Expense Gateway starting");
    info!(
        upstream = %config.upstream_url,
        timeout_secs = config.upstream_timeout.as_secs(),
        "Upstream configured"
    );

    let upstream =
        UpstreamClient::from_config(&config).context("Failed to build upstream HTTP client")?;
    let app = router(AppState::new(upstream));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server is running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
