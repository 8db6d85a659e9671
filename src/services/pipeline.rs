//! End-to-end forecast: fetch, normalize, featurize, scale, fit, roll
//! forward, assemble.

use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::services::assembler::assemble;
use crate::services::features::{build_features, FeatureSet};
use crate::services::model::{ForecastModel, ModelSettings, TrainingMatrix};
use crate::services::predictor::{MultiStepPredictor, DEFAULT_MAX_CHANGE_CAP};
use crate::services::scaler::ScalerPair;
use crate::sources::MarketData;
use crate::types::{ForecastResponse, Granularity, HistoryWindow, OhlcvBar};

/// Fewest bars a fetched series may have before it is worth modelling.
pub const MIN_HISTORY_BARS: usize = 30;

/// Most rows the SVR is fitted on. Kernel cost grows with the square of the
/// row count; longer histories are fitted on their trailing rows.
pub const MAX_TRAINING_ROWS: usize = 500;

/// Process-wide pipeline configuration, passed into every forecast.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub feature_set: FeatureSet,
    pub model: ModelSettings,
    /// Per-step move cap as a fraction of the last price.
    pub max_change_cap: f64,
    pub min_bars: usize,
    pub max_training_rows: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            feature_set: FeatureSet::default(),
            model: ModelSettings::default(),
            max_change_cap: DEFAULT_MAX_CHANGE_CAP,
            min_bars: MIN_HISTORY_BARS,
            max_training_rows: MAX_TRAINING_ROWS,
        }
    }
}

/// One forecast request after parameter validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub symbol: String,
    pub window: HistoryWindow,
    pub granularity: Granularity,
    pub predict_days: usize,
    pub include_summary: bool,
}

/// Sort bars by time and drop duplicate timestamps, keeping the later row.
pub fn normalize_bars(mut bars: Vec<OhlcvBar>) -> Vec<OhlcvBar> {
    bars.sort_by_key(|b| b.time);
    let mut normalized: Vec<OhlcvBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match normalized.last_mut() {
            Some(last) if last.time == bar.time => *last = bar,
            _ => normalized.push(bar),
        }
    }
    normalized
}

/// Reject series too short to model.
pub fn validate_history(symbol: &str, bars: &[OhlcvBar], min_bars: usize) -> Result<()> {
    if bars.is_empty() {
        return Err(AppError::InsufficientData(format!(
            "No data received for {}",
            symbol
        )));
    }
    if bars.len() < min_bars.max(2) {
        return Err(AppError::InsufficientData(format!(
            "{} has {} bars, need at least {}",
            symbol,
            bars.len(),
            min_bars.max(2)
        )));
    }
    Ok(())
}

/// Run the model side of the pipeline on an already-fetched series.
///
/// Synchronous and CPU-bound; async callers go through [`run_forecast`].
pub fn forecast_from_bars(
    bars: &[OhlcvBar],
    request: &ForecastRequest,
    settings: &PipelineSettings,
) -> Result<ForecastResponse> {
    let training = build_features(bars, settings.feature_set);
    if training.is_empty() {
        return Err(AppError::InsufficientData(format!(
            "{} has {} bars, need at least 2 to derive features",
            request.symbol,
            bars.len()
        )));
    }

    let last_date = bars
        .last()
        .and_then(|b| b.date())
        .ok_or_else(|| AppError::Internal("last bar has no valid date".into()))?;
    let predictor = MultiStepPredictor::new(&training, last_date, settings.max_change_cap)?;

    let steps = if request.predict_days == 0 {
        Vec::new()
    } else {
        let window = training.tail(settings.max_training_rows.max(2));
        let scaled = ScalerPair::fit(&window.features, &window.target)?;
        let parameters = settings.model.parameters(&scaled.features);
        let data = TrainingMatrix::new(&scaled.features, &scaled.target)?;
        let model = ForecastModel::fit(&data, &parameters)?;
        debug!(
            symbol = %request.symbol,
            columns = ?settings.feature_set.columns(),
            rows = data.rows(),
            history = training.len(),
            gamma = settings.model.gamma_for(&scaled.features),
            bound = predictor.max_daily_change(),
            "model fitted"
        );
        predictor.predict(&model, &scaled.scalers, request.predict_days)?
    };

    if let Some(last) = steps.last() {
        info!(
            "Forecast {}: {:.4} -> {:.4} over {} days",
            request.symbol,
            predictor.last_close(),
            last.price,
            steps.len()
        );
    }

    assemble(bars, request.granularity, &steps, request.include_summary)
}

/// Fetch history for the request and run the full pipeline.
pub async fn run_forecast<S: MarketData>(
    source: &S,
    request: ForecastRequest,
    settings: &PipelineSettings,
) -> Result<ForecastResponse> {
    let bars = source
        .fetch_bars(&request.symbol, request.window, request.granularity)
        .await?;
    let bars = normalize_bars(bars);
    validate_history(&request.symbol, &bars, settings.min_bars)?;

    debug!(
        "Fetched {} bars for {} ({}, {})",
        bars.len(),
        request.symbol,
        request.window.as_str(),
        request.granularity.as_str()
    );

    let settings = settings.clone();
    tokio::task::spawn_blocking(move || forecast_from_bars(&bars, &request, &settings))
        .await
        .map_err(|e| AppError::Internal(format!("forecast task failed: {}", e)))?
}
