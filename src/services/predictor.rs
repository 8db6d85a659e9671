//! Multi-step forecasting with a chained volatility clamp.
//!
//! Future feature rows reuse the indicator values of the last historical
//! bar; only `time_index` advances. Each raw prediction is clamped to
//! `last_price +/- max_daily_change`, and the clamped value becomes the
//! next step's `last_price`.

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::services::features::TrainingSet;
use crate::services::indicators::{pct_change, sample_std};
use crate::services::model::Regressor;
use crate::services::scaler::ScalerPair;

/// Upper bound on the per-step move as a fraction of price.
pub const DEFAULT_MAX_CHANGE_CAP: f64 = 0.1;

/// One forecast step.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionStep {
    pub date: NaiveDate,
    pub price: f64,
}

/// Largest move allowed per step:
/// `min(2 * std(pct returns), cap) * last_price`.
///
/// Fewer than two returns give no volatility estimate, and the bound is 0.
pub fn max_daily_change(closes: &[f64], cap: f64) -> f64 {
    let Some(&last_price) = closes.last() else {
        return 0.0;
    };
    let volatility = sample_std(&pct_change(closes));
    let volatility = if volatility.is_finite() { volatility } else { 0.0 };
    (volatility * 2.0).min(cap) * last_price
}

/// Frozen state needed to roll a forecast forward from the last bar.
#[derive(Debug, Clone)]
pub struct MultiStepPredictor {
    base_row: Vec<f64>,
    history_len: usize,
    last_close: f64,
    last_date: NaiveDate,
    max_daily_change: f64,
}

impl MultiStepPredictor {
    /// Capture the last feature row, last close and clamp bound.
    pub fn new(training: &TrainingSet, last_date: NaiveDate, cap: f64) -> Result<Self> {
        let base_row = training
            .last_row()
            .ok_or_else(|| AppError::InsufficientData("no feature rows to extend".into()))?
            .to_vec();
        let last_close = *training
            .target
            .last()
            .ok_or_else(|| AppError::InsufficientData("no closes to extend".into()))?;

        Ok(Self {
            base_row,
            history_len: training.len(),
            last_close,
            last_date,
            max_daily_change: max_daily_change(&training.target, cap),
        })
    }

    pub fn max_daily_change(&self) -> f64 {
        self.max_daily_change
    }

    pub fn last_close(&self) -> f64 {
        self.last_close
    }

    /// Unscaled feature row for future step `step` (0-based).
    pub fn future_row(&self, step: usize) -> Vec<f64> {
        let mut row = self.base_row.clone();
        row[0] = (self.history_len + step) as f64;
        row
    }

    /// Produce `predict_days` clamped prices on consecutive calendar days.
    pub fn predict<R: Regressor>(
        &self,
        model: &R,
        scalers: &ScalerPair,
        predict_days: usize,
    ) -> Result<Vec<PredictionStep>> {
        let mut steps = Vec::with_capacity(predict_days);
        let mut last_price = self.last_close;

        for step in 0..predict_days {
            let scaled = scalers.features.transform_row(&self.future_row(step))?;
            let raw = scalers.target.inverse_value(model.predict_one(&scaled)?)?;
            if !raw.is_finite() {
                return Err(AppError::NonFinite(format!(
                    "prediction for step {} is not finite",
                    step
                )));
            }

            let price = raw.clamp(
                last_price - self.max_daily_change,
                last_price + self.max_daily_change,
            );
            let date = self
                .last_date
                .checked_add_days(Days::new(step as u64 + 1))
                .ok_or_else(|| AppError::Internal("forecast date out of range".into()))?;

            debug!(step, raw, price, "forecast step");
            steps.push(PredictionStep { date, price });
            last_price = price;
        }

        Ok(steps)
    }
}
