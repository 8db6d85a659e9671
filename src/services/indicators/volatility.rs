//! Dispersion measures: rolling standard deviation and returns.

/// Sample standard deviation (n - 1 denominator). `NaN` below two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Trailing sample standard deviation over `period` values.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period < 2 || values.len() < period {
        return out;
    }
    for i in (period - 1)..values.len() {
        out[i] = sample_std(&values[i + 1 - period..=i]);
    }
    out
}

/// Fractional change between consecutive values. One element shorter than
/// the input; returns from a zero base are dropped.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .filter(|r| r.is_finite())
        .collect()
}
