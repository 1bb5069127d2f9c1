use anyhow::Context;

use blog_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    blog_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let services = blog_api::app::services::build_services(&config.store)
        .await
        .context("failed to initialise article store")?;
    let app = blog_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        store = config.store.name(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
