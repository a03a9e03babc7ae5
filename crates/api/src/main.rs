use anyhow::Context;

use tair_api::app::services;
use tair_infra::StoreBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tair_observability::init();

    let backend = StoreBackend::from_env().context("invalid store configuration")?;
    let service = services::build_service(backend).context("failed to configure catalog store")?;

    let app = tair_api::app::build_app(service);

    let listener = tokio::net::TcpListener::bind(tair_api::LISTEN_ADDR)
        .await
        .with_context(|| format!("failed to bind {}", tair_api::LISTEN_ADDR))?;

    tracing::info!(?backend, "listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
