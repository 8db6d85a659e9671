//! Simple Moving Average (SMA).

/// Trailing mean over `period` values.
///
/// The first `period - 1` positions are `NaN`. A period of zero yields an
/// all-`NaN` series.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = sum / period as f64;
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = sum / period as f64;
    }
    out
}
