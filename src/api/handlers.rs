use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::services::providers;
use crate::services::recommender::{self, RecommendError};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub song_name: String,
    /// Overrides the configured default when present
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendedSong {
    pub name: String,
    pub artists: String,
    pub track_id: String,
    pub image_url: String,
    pub similarity: f32,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub recommendations: Vec<RecommendedSong>,
}

#[derive(Debug, Serialize)]
pub struct PopularSong {
    pub name: String,
    pub artists: String,
    pub track_id: String,
    pub image_url: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommend songs similar to the named query song
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let song_name = request.song_name.trim();
    if song_name.is_empty() {
        return Err(AppError::InvalidInput(
            "Song name cannot be empty".to_string(),
        ));
    }

    let count = request.count.unwrap_or(state.default_count);
    if count == 0 {
        return Err(AppError::InvalidInput(
            "Count must be at least 1".to_string(),
        ));
    }

    let ranked =
        recommender::recommend(&state.catalog, song_name, count).map_err(map_recommend_error)?;

    let track_ids: Vec<String> = ranked
        .iter()
        .map(|r| state.catalog.song(r.index).track_id.clone())
        .collect();
    let urls = providers::fetch_artwork_batch(Arc::clone(&state.provider), track_ids).await;

    let recommendations: Vec<RecommendedSong> = ranked
        .iter()
        .zip(urls)
        .map(|(r, image_url)| {
            let song = state.catalog.song(r.index);
            RecommendedSong {
                name: song.name.clone(),
                artists: song.display_artists(),
                track_id: song.track_id.clone(),
                image_url,
                similarity: r.score,
            }
        })
        .collect();

    tracing::info!(
        query = %song_name,
        results = recommendations.len(),
        "Recommendations served"
    );

    Ok(Json(RecommendationResponse {
        query: song_name.to_string(),
        recommendations,
    }))
}

/// The fixed top-50 popular list, enriched with artwork
///
/// Never fails: the list is served in stored order even when every artwork
/// lookup degrades to a placeholder.
pub async fn popular(State(state): State<AppState>) -> Json<Vec<PopularSong>> {
    let songs = state.catalog.popular();
    let track_ids: Vec<String> = songs.iter().map(|song| song.track_id.clone()).collect();
    let urls = providers::fetch_artwork_batch(Arc::clone(&state.provider), track_ids).await;

    let response: Vec<PopularSong> = songs
        .iter()
        .zip(urls)
        .map(|(song, image_url)| PopularSong {
            name: song.name.clone(),
            artists: song.display_artists(),
            track_id: song.track_id.clone(),
            image_url,
        })
        .collect();

    Json(response)
}

/// All catalog song names in order, for client-side autocomplete
pub async fn songs(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.names())
}

fn map_recommend_error(err: RecommendError) -> AppError {
    match err {
        RecommendError::SongNotFound(_) => AppError::NotFound(err.to_string()),
        RecommendError::EmptyCatalog | RecommendError::DimensionMismatch { .. } => {
            AppError::Computation(err.to_string())
        }
    }
}
