pub mod forecast;
pub mod health;
pub mod suggestions;
pub mod symbols;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/predict", forecast::router())
        .nest("/suggestions", suggestions::router())
        .nest("/symbols", symbols::router())
}
