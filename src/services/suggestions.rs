//! Ranks a shortlist of symbols by forecast growth.

use std::cmp::Ordering;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::services::assembler::round2;
use crate::services::pipeline::{run_forecast, ForecastRequest, PipelineSettings};
use crate::sources::MarketData;
use crate::types::{ForecastResponse, Granularity, HistoryWindow, Suggestion};

/// Suggestions returned per call.
pub const MAX_SUGGESTIONS: usize = 3;

/// History scanned per candidate.
pub const SUGGESTION_WINDOW: HistoryWindow = HistoryWindow::ThreeMonths;

/// Forecast horizon per candidate, in days.
pub const SUGGESTION_HORIZON: usize = 7;

/// Growth from the last close to the final prediction, if both exist.
pub fn suggestion_from(symbol: &str, forecast: &ForecastResponse) -> Option<Suggestion> {
    let current = *forecast.historical.prices.last()?;
    let predicted = *forecast.predictions.prices.last()?;
    if current <= 0.0 || !current.is_finite() || !predicted.is_finite() {
        return None;
    }

    Some(Suggestion {
        symbol: symbol.to_string(),
        current_price: current,
        predicted_price: predicted,
        predicted_growth: round2((predicted - current) / current * 100.0),
    })
}

/// Sort by descending growth and keep the best [`MAX_SUGGESTIONS`].
pub fn rank(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| {
        b.predicted_growth
            .partial_cmp(&a.predicted_growth)
            .unwrap_or(Ordering::Equal)
    });
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Forecast every candidate and return the top growers. Candidates whose
/// fetch or fit fails are skipped.
pub async fn suggest<S: MarketData>(
    source: &S,
    candidates: &[String],
    settings: &PipelineSettings,
) -> Vec<Suggestion> {
    let runs = candidates.iter().map(|symbol| async move {
        let request = ForecastRequest {
            symbol: symbol.clone(),
            window: SUGGESTION_WINDOW,
            granularity: Granularity::OneDay,
            predict_days: SUGGESTION_HORIZON,
            include_summary: false,
        };
        (symbol, run_forecast(source, request, settings).await)
    });

    let mut suggestions = Vec::with_capacity(candidates.len());
    for (symbol, result) in join_all(runs).await {
        match result {
            Ok(forecast) => suggestions.extend(suggestion_from(symbol, &forecast)),
            Err(e) if e.is_upstream() => warn!("Skipping {}: fetch failed: {}", symbol, e),
            Err(e) => warn!("Skipping {}: {}", symbol, e),
        }
    }

    let ranked = rank(suggestions);
    info!(
        "Scanned {} candidates, suggesting {:?}",
        candidates.len(),
        ranked.iter().map(|s| s.symbol.as_str()).collect::<Vec<_>>()
    );
    ranked
}
