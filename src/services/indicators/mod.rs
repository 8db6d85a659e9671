//! Rolling technical indicators over close/volume series.
//!
//! Every function returns a vector aligned with its input. Positions where
//! the trailing window has not filled yet hold `NaN`; callers run
//! [`fill_gaps`] before anything reaches the model.

pub mod rsi;
pub mod sma;
pub mod volatility;

pub use rsi::rolling_rsi;
pub use sma::rolling_mean;
pub use volatility::{pct_change, rolling_std, sample_std};

/// Forward-fill then back-fill `NaN` entries in place.
///
/// Leading gaps take the first computable value; interior gaps take the
/// last one seen. A series with no finite value is left untouched.
pub fn fill_gaps(values: &mut [f64]) {
    let mut last = None;
    for v in values.iter_mut() {
        if v.is_nan() {
            if let Some(prev) = last {
                *v = prev;
            }
        } else {
            last = Some(*v);
        }
    }

    let Some(first) = values.iter().copied().find(|v| !v.is_nan()) else {
        return;
    };
    for v in values.iter_mut() {
        if !v.is_nan() {
            break;
        }
        *v = first;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_gaps_backfills_leading_nan() {
        let mut values = vec![f64::NAN, f64::NAN, 3.0, 4.0];
        fill_gaps(&mut values);
        assert_eq!(values, vec![3.0, 3.0, 3.0, 4.0]);
    }

    #[test]
    fn test_fill_gaps_forward_fills_interior_nan() {
        let mut values = vec![1.0, f64::NAN, f64::NAN, 4.0];
        fill_gaps(&mut values);
        assert_eq!(values, vec![1.0, 1.0, 1.0, 4.0]);
    }

    #[test]
    fn test_fill_gaps_all_nan_untouched() {
        let mut values = vec![f64::NAN, f64::NAN];
        fill_gaps(&mut values);
        assert!(values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_fill_gaps_empty() {
        let mut values: Vec<f64> = Vec::new();
        fill_gaps(&mut values);
        assert!(values.is_empty());
    }
}
