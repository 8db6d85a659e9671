use crate::services::FeatureSet;
use crate::sources::DataSourceKind;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    data_source: DataSourceKind,
    feature_set: FeatureSet,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        data_source: state.market_data.kind(),
        feature_set: state.settings.feature_set,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
