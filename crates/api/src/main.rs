//! IntentRelay server entry point

use std::sync::Arc;

use anyhow::Context;
use intentrelay_api::utils::logging;
use intentrelay_api::{router, AppContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = intentrelay_infra::config::load().context("failed to load configuration")?;
    logging::init(&config.log_level);

    let bind_address = config.server.bind_address.clone();
    let ctx = Arc::new(AppContext::new(config).context("failed to initialize application")?);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    tracing::info!(address = %bind_address, version = env!("CARGO_PKG_VERSION"), "IntentRelay listening");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("IntentRelay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
