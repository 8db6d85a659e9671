//! Packages history and predictions into the forecast response.

use crate::error::{AppError, Result};
use crate::services::predictor::PredictionStep;
use crate::types::{ForecastResponse, ForecastSummary, Granularity, OhlcvBar, SeriesPayload};

const PREDICTION_DATE_FORMAT: &str = "%Y-%m-%d";

/// Round to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build the response. Fails if any price, including the summary, is not
/// finite.
pub fn assemble(
    bars: &[OhlcvBar],
    granularity: Granularity,
    steps: &[PredictionStep],
    include_summary: bool,
) -> Result<ForecastResponse> {
    let date_format = granularity.date_format();
    let mut historical = SeriesPayload {
        dates: Vec::with_capacity(bars.len()),
        prices: Vec::with_capacity(bars.len()),
    };
    for bar in bars {
        let when = bar
            .datetime()
            .ok_or_else(|| AppError::Internal(format!("bar timestamp {} out of range", bar.time)))?;
        ensure_finite(bar.close, "historical close")?;
        historical.dates.push(when.format(date_format).to_string());
        historical.prices.push(bar.close);
    }

    let mut predictions = SeriesPayload {
        dates: Vec::with_capacity(steps.len()),
        prices: Vec::with_capacity(steps.len()),
    };
    for step in steps {
        ensure_finite(step.price, "predicted price")?;
        predictions
            .dates
            .push(step.date.format(PREDICTION_DATE_FORMAT).to_string());
        predictions.prices.push(step.price);
    }

    let summary = match (include_summary, bars.last(), steps.last()) {
        (true, Some(bar), Some(step)) => Some(ForecastSummary {
            current_price: round2(bar.close),
            final_prediction: round2(step.price),
            final_date: step.date.format(PREDICTION_DATE_FORMAT).to_string(),
        }),
        _ => None,
    };

    Ok(ForecastResponse {
        historical,
        predictions,
        summary,
    })
}

fn ensure_finite(value: f64, what: &str) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AppError::NonFinite(format!("{} is {}", what, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars(closes: &[f64]) -> Vec<OhlcvBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                // 2024-01-01T00:00:00Z plus i days
                time: 1_704_067_200_000 + i as i64 * 86_400_000,
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect()
    }

    fn steps(prices: &[f64]) -> Vec<PredictionStep> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PredictionStep {
                date: NaiveDate::from_ymd_opt(2024, 1, 4 + i as u32).unwrap(),
                price,
            })
            .collect()
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(1.235001), 1.24);
        assert_eq!(round2(-2.5), -2.5);
    }

    #[test]
    fn test_assemble_daily() {
        let response = assemble(
            &bars(&[100.0, 101.0, 102.456]),
            Granularity::OneDay,
            &steps(&[103.123, 104.987]),
            true,
        )
        .unwrap();

        assert_eq!(response.historical.dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(response.historical.prices, vec![100.0, 101.0, 102.456]);
        assert_eq!(response.predictions.dates, vec!["2024-01-04", "2024-01-05"]);
        assert_eq!(response.predictions.prices, vec![103.123, 104.987]);

        let summary = response.summary.unwrap();
        assert_eq!(summary.current_price, 102.46);
        assert_eq!(summary.final_prediction, 104.99);
        assert_eq!(summary.final_date, "2024-01-05");
    }

    #[test]
    fn test_assemble_intraday_labels() {
        let mut series = bars(&[1.0, 2.0]);
        series[1].time = series[0].time + 4 * 3_600_000;
        let response = assemble(&series, Granularity::FourHours, &[], false).unwrap();
        assert_eq!(response.historical.dates, vec!["2024-01-01 00:00", "2024-01-01 04:00"]);
    }

    #[test]
    fn test_summary_omitted_when_not_requested() {
        let response =
            assemble(&bars(&[1.0, 2.0]), Granularity::OneDay, &steps(&[3.0]), false).unwrap();
        assert!(response.summary.is_none());
    }

    #[test]
    fn test_summary_omitted_without_predictions() {
        let response = assemble(&bars(&[1.0, 2.0]), Granularity::OneDay, &[], true).unwrap();
        assert!(response.summary.is_none());
        assert!(response.predictions.prices.is_empty());
    }

    #[test]
    fn test_nan_prediction_fails() {
        let result = assemble(&bars(&[1.0, 2.0]), Granularity::OneDay, &steps(&[f64::NAN]), true);
        assert!(matches!(result, Err(AppError::NonFinite(_))));
    }

    #[test]
    fn test_infinite_close_fails() {
        let result = assemble(&bars(&[1.0, f64::INFINITY]), Granularity::OneDay, &[], true);
        assert!(matches!(result, Err(AppError::NonFinite(_))));
    }
}
