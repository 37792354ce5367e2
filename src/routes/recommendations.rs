use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub include_posters: bool,
    /// Overrides the server's configured metadata API key
    pub api_key: Option<String>,
}

fn default_top_n() -> usize {
    6
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub recommendations: Vec<RecommendedMovie>,
}

#[derive(Debug, Serialize)]
pub struct RecommendedMovie {
    pub title: String,
    pub score: f32,
    pub external_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

/// Handler for the recommendations endpoint
///
/// An unknown title produces an empty list, not an error. Poster lookups
/// fan out in parallel when requested and a credential is available; a
/// failed lookup degrades that entry to no poster.
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    if request.top_n < 1 {
        return Err(AppError::InvalidInput(
            "top_n must be at least 1".to_string(),
        ));
    }

    let results = state.engine.recommend(&request.title, request.top_n)?;

    tracing::info!(
        title = %request.title,
        top_n = request.top_n,
        results = results.len(),
        "Recommendations computed"
    );

    let mut recommendations: Vec<RecommendedMovie> = results
        .into_iter()
        .map(|r| RecommendedMovie {
            title: r.title,
            score: r.score,
            external_id: r.external_id,
            poster_url: None,
        })
        .collect();

    let api_key = request
        .api_key
        .or_else(|| state.default_api_key.clone())
        .unwrap_or_default();

    if request.include_posters && !api_key.is_empty() {
        let mut tasks = Vec::with_capacity(recommendations.len());
        for movie in &recommendations {
            let provider = state.posters.clone();
            let key = api_key.clone();
            let external_id = movie.external_id;
            tasks.push(tokio::spawn(
                async move { provider.resolve(external_id, &key).await },
            ));
        }

        for (movie, task) in recommendations.iter_mut().zip(tasks) {
            movie.poster_url = task.await.ok().flatten();
        }
    }

    Ok(Json(RecommendationResponse {
        query: request.title,
        recommendations,
    }))
}
