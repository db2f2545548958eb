use std::sync::Arc;

/// Track metadata provider abstraction
///
/// Recommendation ranking works entirely from the in-memory catalog; cover
/// artwork is a best-effort enrichment fetched from an external service. The
/// boundary is therefore infallible by design: every failure mode (missing
/// credentials, network error, track without artwork) degrades to a fixed
/// placeholder URL instead of propagating an error to the caller.
pub mod spotify;

pub use spotify::SpotifyProvider;

/// Artwork URL when the provider has no credentials
pub const PLACEHOLDER_NO_CREDENTIALS: &str =
    "https://placehold.co/600x400/ef4444/ffffff?text=API+Connection+Failed";
/// Artwork URL when a track carries no album images
pub const PLACEHOLDER_NO_IMAGE: &str =
    "https://placehold.co/300x300/cccccc/ffffff?text=No+Image";
/// Artwork URL when the track lookup itself fails
pub const PLACEHOLDER_LOOKUP_FAILED: &str =
    "https://placehold.co/600x400/fbbf24/ffffff?text=Track+Info+Error";

/// Trait for track metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrackMetadataProvider: Send + Sync {
    /// Resolve the cover artwork URL for a track.
    ///
    /// Never fails: any error is absorbed here and reported as a placeholder URL.
    async fn artwork_url(&self, track_id: &str) -> String;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Fetch artwork for a batch of tracks in parallel, preserving input order.
///
/// Lookups run as independent tasks so one slow track does not serialize the
/// rest of the page. A joined task that panicked degrades to the lookup-failed
/// placeholder like any other per-track failure.
pub async fn fetch_artwork_batch(
    provider: Arc<dyn TrackMetadataProvider>,
    track_ids: Vec<String>,
) -> Vec<String> {
    let mut tasks = Vec::with_capacity(track_ids.len());
    for track_id in track_ids {
        let provider = Arc::clone(&provider);
        tasks.push(tokio::spawn(
            async move { provider.artwork_url(&track_id).await },
        ));
    }

    let mut urls = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(url) => urls.push(url),
            Err(e) => {
                tracing::error!(error = %e, "Artwork task join error");
                urls.push(PLACEHOLDER_LOOKUP_FAILED.to_string());
            }
        }
    }
    urls
}
