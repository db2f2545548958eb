use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::models::Song;

/// Error types for catalog loading and validation
///
/// All of these are fatal at startup: the service refuses to serve without a
/// well-formed catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog contains no songs")]
    Empty,
    #[error("catalog has {songs} songs but {rows} feature rows")]
    RowCountMismatch { songs: usize, rows: usize },
    #[error("feature row {index} has {actual} dimensions, expected {expected}")]
    RaggedFeatures {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("feature vectors have zero dimensions")]
    ZeroDimension,
}

/// On-disk shape of the catalog file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    songs: Vec<Song>,
    features: Vec<Vec<f32>>,
}

/// The song catalog: every known song, its scaled feature vector, and the
/// fixed top-50 popular list.
///
/// Loaded once at startup, validated, and shared read-only for the process
/// lifetime. Row `i` of `features` describes `songs[i]`; that alignment is
/// checked at construction and never changes afterwards.
#[derive(Debug)]
pub struct Catalog {
    songs: Vec<Song>,
    features: Vec<Vec<f32>>,
    popular: Vec<Song>,
}

impl Catalog {
    /// Loads and validates the catalog and popular list from JSON files
    pub fn load(
        catalog_path: impl AsRef<Path>,
        popular_path: impl AsRef<Path>,
    ) -> Result<Self, CatalogError> {
        let file: CatalogFile = read_json(catalog_path.as_ref())?;
        let popular: Vec<Song> = read_json(popular_path.as_ref())?;
        Self::new(file.songs, file.features, popular)
    }

    /// Builds a catalog from already-loaded parts, validating the feature matrix
    pub fn new(
        songs: Vec<Song>,
        features: Vec<Vec<f32>>,
        popular: Vec<Song>,
    ) -> Result<Self, CatalogError> {
        if songs.is_empty() {
            return Err(CatalogError::Empty);
        }
        if features.len() != songs.len() {
            return Err(CatalogError::RowCountMismatch {
                songs: songs.len(),
                rows: features.len(),
            });
        }
        let expected = features[0].len();
        if expected == 0 {
            return Err(CatalogError::ZeroDimension);
        }
        for (index, row) in features.iter().enumerate() {
            if row.len() != expected {
                return Err(CatalogError::RaggedFeatures {
                    index,
                    expected,
                    actual: row.len(),
                });
            }
        }
        Ok(Self {
            songs,
            features,
            popular,
        })
    }

    /// Builds a catalog without validating the feature matrix.
    ///
    /// Only for exercising the recommender's own malformed-data handling.
    #[cfg(test)]
    pub(crate) fn new_unchecked(
        songs: Vec<Song>,
        features: Vec<Vec<f32>>,
        popular: Vec<Song>,
    ) -> Self {
        Self {
            songs,
            features,
            popular,
        }
    }

    /// Number of songs in the catalog
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// The song at a catalog index
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; indices come from this catalog's
    /// own `0..len()` range.
    pub fn song(&self, index: usize) -> &Song {
        &self.songs[index]
    }

    /// The feature vector for the song at a catalog index
    pub fn feature_row(&self, index: usize) -> &[f32] {
        &self.features[index]
    }

    /// Index of the first song whose name matches exactly (case-sensitive),
    /// in catalog order
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.songs.iter().position(|song| song.name == name)
    }

    /// All song names in catalog order
    pub fn names(&self) -> Vec<String> {
        self.songs.iter().map(|song| song.name.clone()).collect()
    }

    /// The fixed popular list, in stored order
    pub fn popular(&self) -> &[Song] {
        &self.popular
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}
