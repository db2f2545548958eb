use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the catalog file (songs plus their scaled feature vectors)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the popular-songs file (the fixed top-50 list)
    #[serde(default = "default_popular_path")]
    pub popular_path: String,

    /// Spotify client ID; artwork lookups are disabled when absent
    pub spotify_client_id: Option<String>,

    /// Spotify client secret; artwork lookups are disabled when absent
    pub spotify_client_secret: Option<String>,

    /// Number of recommendations returned when a request does not ask for a count
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_popular_path() -> String {
    "data/popular.json".to_string()
}

fn default_recommendation_count() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
