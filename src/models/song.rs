use serde::{Deserialize, Serialize};

/// A single catalog entry: a song plus the Spotify track ID used for artwork lookups
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    /// Song title; exact-match key for recommendation queries (not guaranteed unique)
    pub name: String,
    /// Performing artists, in dataset order
    #[serde(default)]
    pub artists: Vec<String>,
    /// Spotify track ID
    #[serde(rename = "id")]
    pub track_id: String,
}

impl Song {
    /// Creates a new song
    pub fn new(name: impl Into<String>, artists: Vec<String>, track_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artists,
            track_id: track_id.into(),
        }
    }

    /// Artists joined for display, e.g. "Queen, David Bowie"
    pub fn display_artists(&self) -> String {
        self.artists.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_artists_joins_with_commas() {
        let song = Song::new(
            "Under Pressure",
            vec!["Queen".to_string(), "David Bowie".to_string()],
            "1b8Rs1PpmYPxeZbLUzFRkM",
        );
        assert_eq!(song.display_artists(), "Queen, David Bowie");
    }

    #[test]
    fn test_song_deserializes_spotify_id_field() {
        let song: Song = serde_json::from_str(
            r#"{"name": "Hey Jude", "artists": ["The Beatles"], "id": "0aym2LBJBk9DAYuHHutrIl"}"#,
        )
        .unwrap();
        assert_eq!(song.name, "Hey Jude");
        assert_eq!(song.track_id, "0aym2LBJBk9DAYuHHutrIl");
    }

    #[test]
    fn test_song_artists_default_to_empty() {
        let song: Song = serde_json::from_str(r#"{"name": "Unknown", "id": "x"}"#).unwrap();
        assert!(song.artists.is_empty());
    }
}
