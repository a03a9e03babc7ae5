use anyhow::Context;

use tair_storefront::{client::CatalogClient, config::StorefrontConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tair_observability::init();

    let config = StorefrontConfig::from_env();
    let client = CatalogClient::new(config.api_base_url.clone()).context("failed to build API client")?;

    let app = tair_storefront::app::build_app(client);

    let listener = tokio::net::TcpListener::bind(tair_storefront::LISTEN_ADDR)
        .await
        .with_context(|| format!("failed to bind {}", tair_storefront::LISTEN_ADDR))?;

    tracing::info!(api = %config.api_base_url, "listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
