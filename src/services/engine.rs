use std::sync::Arc;

use moka::sync::Cache;

use crate::data::{Catalog, SimilarityIndex};
use crate::error::AppResult;
use crate::models::Recommendation;

/// Bound on distinct (title, top_n) results kept in memory
const RESULT_CACHE_CAPACITY: u64 = 1024;

/// Top-K similarity lookup over the catalog and similarity index
///
/// Both inputs are immutable process-wide state, so results are a pure
/// function of `(title, top_n)` and are memoized.
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    similarity: Arc<SimilarityIndex>,
    cache: Cache<(String, usize), Arc<Vec<Recommendation>>>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<Catalog>, similarity: Arc<SimilarityIndex>) -> Self {
        Self {
            catalog,
            similarity,
            cache: Cache::new(RESULT_CACHE_CAPACITY),
        }
    }

    /// Returns the `top_n` movies most similar to `title`
    ///
    /// An unknown title is a normal outcome and yields an empty result,
    /// not an error. Candidates are ordered by score descending; ties
    /// retain catalog position order, so results are deterministic for a
    /// given matrix. The first-ranked entry is dropped by offset on the
    /// assumption that a movie is maximally similar to itself — when a
    /// near-duplicate outscores it, the dropped entry is that duplicate,
    /// not the query movie.
    ///
    /// `top_n` is not clamped here; callers own range validation. At most
    /// N-1 candidates exist.
    pub fn recommend(&self, title: &str, top_n: usize) -> AppResult<Vec<Recommendation>> {
        let key = (title.to_owned(), top_n);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(title = %title, top_n, "Recommendation cache hit");
            return Ok(hit.as_ref().clone());
        }

        let movie = match self.catalog.find_by_title(title) {
            Some(movie) => movie,
            None => {
                tracing::debug!(title = %title, "Title not in catalog");
                return Ok(Vec::new());
            }
        };

        let row = self.similarity.row(movie.position)?;

        let mut candidates: Vec<(usize, f32)> = row.iter().copied().enumerate().collect();
        // Stable sort: equal scores keep ascending position order.
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

        let results: Vec<Recommendation> = candidates
            .into_iter()
            .skip(1)
            .take(top_n)
            .filter_map(|(position, score)| {
                self.catalog.by_position(position).map(|movie| Recommendation {
                    title: movie.title.clone(),
                    score,
                    external_id: movie.external_id,
                })
            })
            .collect();

        self.cache.insert(key, Arc::new(results.clone()));

        Ok(results)
    }
}
