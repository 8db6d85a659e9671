//! Forecast endpoint.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::{run_forecast, ForecastRequest};
use crate::sources::{yahoo, DataSourceKind};
use crate::types::{ForecastResponse, Granularity, HistoryWindow};
use crate::AppState;

/// Longest symbol accepted in a path.
const MAX_SYMBOL_LEN: usize = 15;

/// Query parameters for the forecast endpoint. Everything arrives as text so
/// bad values produce the same JSON error as every other failure.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    /// History window: 3mo, 6mo, 1y, 2y, 5y
    pub period: Option<String>,
    /// Bar size: 2h, 4h, 1d
    pub interval: Option<String>,
    /// Forecast horizon in days
    pub predict_days: Option<String>,
    /// Include the summary block (default true)
    pub summary: Option<String>,
}

impl ForecastQuery {
    /// Validate parameters against the configured limits.
    pub fn into_request(self, symbol: &str, config: &Config) -> Result<ForecastRequest> {
        let symbol = parse_symbol(symbol)?;

        let window = match self.period.as_deref() {
            None | Some("") => HistoryWindow::default(),
            Some(p) => HistoryWindow::from_str(p).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "unknown period '{}', expected one of 3mo, 6mo, 1y, 2y, 5y",
                    p
                ))
            })?,
        };

        let granularity = match self.interval.as_deref() {
            None | Some("") => Granularity::default(),
            Some(i) => Granularity::from_str(i).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "unknown interval '{}', expected one of 2h, 4h, 1d",
                    i
                ))
            })?,
        };

        if config.data_source == DataSourceKind::Yahoo && !yahoo::supports(window, granularity) {
            return Err(AppError::BadRequest(format!(
                "interval {} is only available for periods under {} days, got {}",
                granularity.as_str(),
                yahoo::INTRADAY_HISTORY_DAYS,
                window.as_str()
            )));
        }

        let predict_days = match self.predict_days.as_deref() {
            None | Some("") => config.default_predict_days,
            Some(raw) => parse_predict_days(raw, config.max_predict_days)?,
        };

        let include_summary = match self.summary.as_deref() {
            None | Some("") | Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "summary must be true or false, got '{}'",
                    other
                )))
            }
        };

        Ok(ForecastRequest {
            symbol,
            window,
            granularity,
            predict_days,
            include_summary,
        })
    }
}

/// Upper-cased symbol made of ASCII letters and digits.
pub fn parse_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty()
        || symbol.len() > MAX_SYMBOL_LEN
        || !symbol.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(AppError::BadRequest(format!("invalid symbol '{}'", raw)));
    }
    Ok(symbol)
}

fn parse_predict_days(raw: &str, max: usize) -> Result<usize> {
    let days: i64 = raw.trim().parse().map_err(|_| {
        AppError::BadRequest(format!("predict_days must be an integer, got '{}'", raw))
    })?;
    if days < 0 {
        return Err(AppError::BadRequest(format!(
            "predict_days must not be negative, got {}",
            days
        )));
    }
    let days = days as usize;
    if days > max {
        return Err(AppError::BadRequest(format!(
            "predict_days must be at most {}, got {}",
            max, days
        )));
    }
    Ok(days)
}

/// GET /predict/:symbol
async fn get_forecast(
    State(state): State<AppState>,
    symbol: std::result::Result<Path<String>, PathRejection>,
    query: std::result::Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<ForecastResponse>> {
    let Path(symbol) = symbol.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let request = query.into_request(&symbol, &state.config)?;
    let forecast = run_forecast(state.market_data.as_ref(), request, &state.settings).await?;
    Ok(Json(forecast))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_forecast))
}
