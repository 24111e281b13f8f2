use std::sync::Arc;

use anyhow::Context;
use nexplay_catalog::tmdb::TmdbClient;
use nexplay_hero::SystemClock;
use nexplay_server::config::ServerConfig;
use nexplay_server::routes::build_router;
use nexplay_server::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;

    std::fs::create_dir_all(&config.cache_dir).context("failed to create cache dir")?;
    info!(cache_dir = %config.cache_dir.display(), "image cache ready");

    let catalog = TmdbClient::new(config.tmdb_api_key.clone()).with_language(config.language.clone());
    info!(language = %config.language, "catalog provider: tmdb");

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        catalog: Arc::new(catalog),
        clock: Arc::new(SystemClock),
        config: Arc::new(config),
        http: reqwest::Client::new(),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "nexplay server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
