use std::sync::Arc;

use crate::data::{Catalog, SimilarityIndex};
use crate::error::{AppError, AppResult};
use crate::services::{PosterProvider, RecommendationEngine};

/// Shared application state
///
/// Catalog, similarity index, and engine are loaded once and never
/// mutated afterwards, so concurrent requests share them without
/// synchronization.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub engine: Arc<RecommendationEngine>,
    pub posters: Arc<dyn PosterProvider>,
    /// Fallback credential used when a request carries no API key
    pub default_api_key: Option<String>,
}

impl AppState {
    /// Builds the state, validating catalog/matrix alignment
    ///
    /// The similarity matrix must have exactly one row per catalog entry;
    /// serving with a misaligned index would return scores for the wrong
    /// movies, so startup halts instead.
    pub fn new(
        catalog: Arc<Catalog>,
        similarity: Arc<SimilarityIndex>,
        posters: Arc<dyn PosterProvider>,
        default_api_key: Option<String>,
    ) -> AppResult<Self> {
        if similarity.len() != catalog.len() {
            return Err(AppError::ShapeMismatch(format!(
                "similarity matrix has {} rows for {} catalog entries",
                similarity.len(),
                catalog.len()
            )));
        }

        let engine = Arc::new(RecommendationEngine::new(catalog.clone(), similarity));

        Ok(Self {
            catalog,
            engine,
            posters,
            default_api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieRecord;
    use crate::services::posters::MockPosterProvider;

    fn two_movie_catalog() -> Arc<Catalog> {
        Arc::new(Catalog::from_records(vec![
            MovieRecord {
                title: "A".to_string(),
                id: Some(1),
            },
            MovieRecord {
                title: "B".to_string(),
                id: Some(2),
            },
        ]))
    }

    #[test]
    fn test_new_rejects_misaligned_similarity() {
        let catalog = two_movie_catalog();
        let similarity = Arc::new(
            SimilarityIndex::from_chunks(vec![vec![
                vec![1.0, 0.5, 0.1],
                vec![0.5, 1.0, 0.2],
                vec![0.1, 0.2, 1.0],
            ]])
            .unwrap(),
        );

        let result = AppState::new(
            catalog,
            similarity,
            Arc::new(MockPosterProvider::new()),
            None,
        );
        assert!(matches!(result, Err(AppError::ShapeMismatch(_))));
    }

    #[test]
    fn test_new_accepts_aligned_similarity() {
        let catalog = two_movie_catalog();
        let similarity = Arc::new(
            SimilarityIndex::from_chunks(vec![vec![vec![1.0, 0.5], vec![0.5, 1.0]]]).unwrap(),
        );

        let state = AppState::new(
            catalog,
            similarity,
            Arc::new(MockPosterProvider::new()),
            Some("key".to_string()),
        )
        .unwrap();
        assert_eq!(state.catalog.len(), 2);
    }
}
