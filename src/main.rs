use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ludicus_reservas::backend::BackendClient;
use ludicus_reservas::cache::start_cache_warmer;
use ludicus_reservas::config::Config;
use ludicus_reservas::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ludicus_reservas=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(backend = %config.backend_url, "Starting reservation form service");

    let backend = BackendClient::new(&config.backend_url, config.http_timeout)
        .context("invalid LUDICUS_BACKEND_URL")?;
    let state = AppState::new(config, backend);

    tokio::spawn(start_cache_warmer(
        state.cache.clone(),
        state.backend.clone(),
        state.config.catalog_ttl,
    ));

    let bind_addr = state.config.bind_addr;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
