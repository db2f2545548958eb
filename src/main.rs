use std::sync::Arc;

use anyhow::Context;

use tunematch_api::api::{create_router, AppState};
use tunematch_api::catalog::Catalog;
use tunematch_api::config::Config;
use tunematch_api::services::providers::{SpotifyProvider, TrackMetadataProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tunematch_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Missing or malformed catalog data is fatal: serving with no data is
    // meaningless.
    let catalog = Catalog::load(&config.catalog_path, &config.popular_path)
        .map(Arc::new)
        .with_context(|| {
            format!(
                "Failed to load catalog from '{}' and '{}'",
                config.catalog_path, config.popular_path
            )
        })?;
    tracing::info!(
        songs = catalog.len(),
        popular = catalog.popular().len(),
        "Catalog loaded"
    );

    let provider: Arc<dyn TrackMetadataProvider> =
        match (&config.spotify_client_id, &config.spotify_client_secret) {
            (Some(client_id), Some(client_secret)) => {
                tracing::info!("Spotify metadata provider enabled");
                Arc::new(SpotifyProvider::new(
                    client_id.clone(),
                    client_secret.clone(),
                ))
            }
            _ => {
                tracing::warn!(
                    "Spotify credentials not configured; artwork will use placeholders"
                );
                Arc::new(SpotifyProvider::disabled())
            }
        };

    let state = AppState::new(catalog, provider, config.recommendation_count);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
