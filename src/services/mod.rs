pub mod engine;
pub mod posters;

pub use engine::RecommendationEngine;
pub use posters::{PosterProvider, TmdbPosterProvider};
