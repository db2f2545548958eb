use std::sync::Arc;

use crate::catalog::Catalog;
use crate::services::providers::TrackMetadataProvider;

/// Shared application state
///
/// The catalog is immutable after startup, so handlers share it through plain
/// `Arc`s with no locking. Cloning the state clones two `Arc`s and a count.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub provider: Arc<dyn TrackMetadataProvider>,
    pub default_count: usize,
}

impl AppState {
    /// Creates the application state shared by every request handler
    pub fn new(
        catalog: Arc<Catalog>,
        provider: Arc<dyn TrackMetadataProvider>,
        default_count: usize,
    ) -> Self {
        Self {
            catalog,
            provider,
            default_count,
        }
    }
}
