use axum::{extract::State, Json};

use crate::state::AppState;

/// Handler for the catalog title listing
///
/// Returns every title in catalog load order, feeding selection lists on
/// the client side.
pub async fn list(State(state): State<AppState>) -> Json<Vec<String>> {
    let titles = state.catalog.titles().map(str::to_owned).collect();
    Json(titles)
}
