//! Relative Strength Index (RSI).

/// Trailing RSI using simple averages of gains and losses over `period`
/// close-to-close deltas.
///
/// The first `period` positions are `NaN` (position 0 has no delta). When
/// the window holds no losses RSI is 100; a window with neither gains nor
/// losses is neutral at 50.
pub fn rolling_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // out[i] covers deltas[i - period..i], i.e. closes[i - period..=i]
    for i in period..closes.len() {
        let window = &deltas[i - period..i];
        let avg_gain = window.iter().map(|d| d.max(0.0)).sum::<f64>() / period as f64;
        let avg_loss = window.iter().map(|d| (-d).max(0.0)).sum::<f64>() / period as f64;
        out[i] = rsi_from_averages(avg_gain, avg_loss);
    }
    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uptrend(count: usize) -> Vec<f64> {
        (0..count).map(|i| 100.0 + i as f64 * 1.5).collect()
    }

    #[test]
    fn test_rsi_warmup_is_nan() {
        let rsi = rolling_rsi(&uptrend(20), 14);
        assert!(rsi[..14].iter().all(|v| v.is_nan()));
        assert!(rsi[14..].iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_rsi_no_losses_is_100() {
        let rsi = rolling_rsi(&uptrend(20), 14);
        assert_relative_eq!(rsi[19], 100.0);
    }

    #[test]
    fn test_rsi_no_gains_is_0() {
        let closes: Vec<f64> = (0..20).map(|i| 200.0 - i as f64).collect();
        let rsi = rolling_rsi(&closes, 14);
        assert_relative_eq!(rsi[19], 0.0);
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let rsi = rolling_rsi(&[10.0; 20], 14);
        assert_relative_eq!(rsi[19], 50.0);
    }

    #[test]
    fn test_rsi_balanced_moves_is_50() {
        let closes: Vec<f64> = (0..21)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let rsi = rolling_rsi(&closes, 14);
        assert_relative_eq!(rsi[20], 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rsi_value_range() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect();
        for v in rolling_rsi(&closes, 14).into_iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn test_rsi_series_too_short() {
        let rsi = rolling_rsi(&uptrend(14), 14);
        assert!(rsi.iter().all(|v| v.is_nan()));
    }
}
