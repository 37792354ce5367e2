use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use cinematch::config::Config;
use cinematch::data::{Catalog, SimilarityIndex};
use cinematch::routes::create_router;
use cinematch::services::TmdbPosterProvider;
use cinematch::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Load the catalog and similarity matrix once; both stay immutable for
    // the process lifetime. A load failure halts startup.
    let catalog = Arc::new(Catalog::load(Path::new(&config.catalog_path))?);
    let similarity = Arc::new(SimilarityIndex::load_dir(Path::new(&config.similarity_dir))?);

    let posters = Arc::new(TmdbPosterProvider::new(
        config.tmdb_api_url.clone(),
        config.poster_image_base.clone(),
        Duration::from_secs(config.poster_timeout_secs),
    )?);

    let state = AppState::new(catalog, similarity, posters, config.tmdb_api_key.clone())?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
