use axum::{extract::State, routing::get, Json, Router};

use crate::error::Result;
use crate::services::suggest;
use crate::types::SuggestionsResponse;
use crate::AppState;

/// GET /suggestions
///
/// Only a failed listing call fails the request; per-symbol failures are
/// skipped.
async fn get_suggestions(State(state): State<AppState>) -> Result<Json<SuggestionsResponse>> {
    let candidates = state
        .catalog
        .rising_symbols(state.config.suggestion_candidates)
        .await?;
    let suggestions = suggest(state.market_data.as_ref(), &candidates, &state.settings).await;
    Ok(Json(SuggestionsResponse { suggestions }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_suggestions))
}
