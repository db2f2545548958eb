use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use tunematch_api::api::{create_router, AppState};
use tunematch_api::catalog::Catalog;
use tunematch_api::models::Song;
use tunematch_api::services::providers::{
    SpotifyProvider, TrackMetadataProvider, PLACEHOLDER_NO_CREDENTIALS,
};

/// Provider that always resolves artwork, for exercising the happy path
struct FixedProvider;

#[async_trait::async_trait]
impl TrackMetadataProvider for FixedProvider {
    async fn artwork_url(&self, track_id: &str) -> String {
        format!("https://img.test/{track_id}.jpg")
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

fn fixture_catalog() -> Arc<Catalog> {
    let songs = vec![
        Song::new("Bohemian Rhapsody", vec!["Queen".to_string()], "track-brq"),
        Song::new(
            "Under Pressure",
            vec!["Queen".to_string(), "David Bowie".to_string()],
            "track-upr",
        ),
        Song::new("Heroes", vec!["David Bowie".to_string()], "track-her"),
        Song::new("Imagine", vec!["John Lennon".to_string()], "track-ima"),
    ];
    // "Under Pressure" is nearly parallel to "Bohemian Rhapsody"; "Heroes" is
    // orthogonal; "Imagine" points the opposite way.
    let features = vec![
        vec![1.0, 0.0],
        vec![1.0, 0.1],
        vec![0.0, 1.0],
        vec![-1.0, 0.0],
    ];
    let popular = vec![songs[2].clone(), songs[0].clone(), songs[3].clone()];
    Arc::new(Catalog::new(songs, features, popular).unwrap())
}

fn create_test_server(provider: Arc<dyn TrackMetadataProvider>) -> TestServer {
    let state = AppState::new(fixture_catalog(), provider, 5);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(Arc::new(FixedProvider));
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_recommendations_ranked_and_enriched() {
    let server = create_test_server(Arc::new(FixedProvider));

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "song_name": "Bohemian Rhapsody" }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["query"], "Bohemian Rhapsody");

    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 3);

    // Ranked by similarity, query itself excluded.
    assert_eq!(recommendations[0]["name"], "Under Pressure");
    assert_eq!(recommendations[1]["name"], "Heroes");
    assert_eq!(recommendations[2]["name"], "Imagine");
    assert!(recommendations
        .iter()
        .all(|song| song["name"] != "Bohemian Rhapsody"));

    // Scores descend.
    let scores: Vec<f64> = recommendations
        .iter()
        .map(|song| song["similarity"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));

    // Enriched with per-track artwork and display-joined artists.
    assert_eq!(
        recommendations[0]["image_url"],
        "https://img.test/track-upr.jpg"
    );
    assert_eq!(recommendations[0]["artists"], "Queen, David Bowie");
}

#[tokio::test]
async fn test_recommendations_respect_requested_count() {
    let server = create_test_server(Arc::new(FixedProvider));

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "song_name": "Heroes", "count": 1 }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_song_returns_not_found_with_name() {
    let server = create_test_server(Arc::new(FixedProvider));

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "song_name": "Definitely Not A Real Song Title XYZ" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Definitely Not A Real Song Title XYZ"));
}

#[tokio::test]
async fn test_blank_song_name_is_rejected() {
    let server = create_test_server(Arc::new(FixedProvider));

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "song_name": "   " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_zero_count_is_rejected() {
    let server = create_test_server(Arc::new(FixedProvider));

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "song_name": "Heroes", "count": 0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_popular_preserves_stored_order_when_artwork_unavailable() {
    // Disabled Spotify provider: every lookup degrades to a placeholder, the
    // endpoint must still succeed with the full list in stored order.
    let server = create_test_server(Arc::new(SpotifyProvider::disabled()));

    let response = server.get("/api/v1/popular").await;
    response.assert_status_ok();

    let body: Vec<serde_json::Value> = response.json();
    assert_eq!(body.len(), 3);
    assert_eq!(body[0]["name"], "Heroes");
    assert_eq!(body[1]["name"], "Bohemian Rhapsody");
    assert_eq!(body[2]["name"], "Imagine");
    assert!(body
        .iter()
        .all(|song| song["image_url"] == PLACEHOLDER_NO_CREDENTIALS));
}

#[tokio::test]
async fn test_recommendations_survive_unavailable_metadata_provider() {
    let server = create_test_server(Arc::new(SpotifyProvider::disabled()));

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "song_name": "Imagine" }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 3);
    assert!(recommendations
        .iter()
        .all(|song| song["image_url"] == PLACEHOLDER_NO_CREDENTIALS));
}

#[tokio::test]
async fn test_songs_lists_all_names_in_catalog_order() {
    let server = create_test_server(Arc::new(FixedProvider));

    let response = server.get("/api/v1/songs").await;
    response.assert_status_ok();

    let names: Vec<String> = response.json();
    assert_eq!(
        names,
        vec!["Bohemian Rhapsody", "Under Pressure", "Heroes", "Imagine"]
    );
}
