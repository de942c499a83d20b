use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use tutorbook_api::app::{self, services};
use tutorbook_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tutorbook_observability::init()?;

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = Arc::new(services::build_services(&config).await?);
    let app = app::build_app(services.clone(), &config.cors_allowed_origins);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    services.shutdown().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
        Err(e) => {
            // Without a signal handler we can only run until killed.
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
