use std::cmp::Ordering;

use thiserror::Error;

use crate::catalog::Catalog;

/// Error types for the recommender
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Sorry, '{0}' was not found in our dataset. Please check the spelling or try another song.")]
    SongNotFound(String),
    #[error("catalog contains no songs")]
    EmptyCatalog,
    #[error("feature row {index} has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// One ranked result: a catalog index and its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    pub index: usize,
    pub score: f32,
}

/// Returns the catalog indices of the up-to-`k` songs most similar to the
/// song named `query_name`, ranked by descending cosine similarity.
///
/// The query is matched case-sensitively against song names; when the name is
/// duplicated, the first entry in catalog order is used. The query song itself
/// is excluded by index, never by score, so a distinct song that happens to
/// score identically is still eligible. Ties keep catalog order (stable sort
/// over ascending indices), which makes the result deterministic for a fixed
/// catalog and query.
pub fn recommend(
    catalog: &Catalog,
    query_name: &str,
    k: usize,
) -> Result<Vec<Ranked>, RecommendError> {
    if catalog.is_empty() {
        return Err(RecommendError::EmptyCatalog);
    }

    let query_index = catalog
        .index_of(query_name)
        .ok_or_else(|| RecommendError::SongNotFound(query_name.to_string()))?;
    let query_row = catalog.feature_row(query_index);
    let expected = query_row.len();

    let mut scored = Vec::with_capacity(catalog.len());
    for index in 0..catalog.len() {
        let row = catalog.feature_row(index);
        if row.len() != expected {
            return Err(RecommendError::DimensionMismatch {
                index,
                expected,
                actual: row.len(),
            });
        }
        scored.push(Ranked {
            index,
            score: cosine_similarity(query_row, row),
        });
    }

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.retain(|ranked| ranked.index != query_index);
    scored.truncate(k);
    Ok(scored)
}

/// Cosine similarity of two equal-length vectors; 0.0 when either has zero norm
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
