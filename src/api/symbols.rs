use axum::{extract::State, routing::get, Json, Router};

use crate::types::SymbolListing;
use crate::AppState;

/// GET /symbols
async fn get_symbols(State(state): State<AppState>) -> Json<SymbolListing> {
    Json(state.catalog.list_symbols().await)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_symbols))
}
