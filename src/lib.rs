//! Specter - short-horizon cryptocurrency price forecasting server

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use services::PipelineSettings;
use sources::{
    BinanceClient, DataSourceKind, MarketDataClient, SymbolCatalog, YahooFinanceClient,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub settings: Arc<PipelineSettings>,
    pub market_data: Arc<MarketDataClient>,
    pub catalog: Arc<SymbolCatalog>,
}

impl AppState {
    /// Build clients and pipeline settings once for the whole process.
    pub fn from_config(config: Config) -> Self {
        let binance = BinanceClient::new(
            config.binance_api_url.clone(),
            config.binance_api_key.clone(),
            config.http_timeout,
        );

        let market_data = match config.data_source {
            DataSourceKind::Yahoo => MarketDataClient::Yahoo(YahooFinanceClient::new(
                config.yahoo_api_url.clone(),
                config.http_timeout,
            )),
            DataSourceKind::Binance => MarketDataClient::Binance(binance.clone()),
        };

        Self {
            settings: Arc::new(config.pipeline_settings()),
            market_data: Arc::new(market_data),
            catalog: Arc::new(SymbolCatalog::new(binance)),
            config: Arc::new(config),
        }
    }
}

/// Full application router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub use error::{AppError, Result};
