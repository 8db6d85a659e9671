//! Min-max scaling of feature matrices and target vectors.

use crate::error::{AppError, Result};

/// Column-wise min-max transform fitted on one matrix.
///
/// Values outside the fitted range map outside `[0, 1]`; nothing is
/// clamped, which is what forecast extrapolation relies on. A constant
/// column uses a unit range so it maps to zero instead of dividing by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    min: Vec<f64>,
    range: Vec<f64>,
}

impl MinMaxScaler {
    /// Learn per-column min and max from `data`.
    pub fn fit(data: &[Vec<f64>]) -> Result<Self> {
        let width = data
            .first()
            .map(|row| row.len())
            .filter(|w| *w > 0)
            .ok_or_else(|| AppError::InsufficientData("cannot fit scaler on empty data".into()))?;

        let mut min = vec![f64::INFINITY; width];
        let mut max = vec![f64::NEG_INFINITY; width];
        for row in data {
            if row.len() != width {
                return Err(AppError::Internal(format!(
                    "ragged matrix: expected {} columns, got {}",
                    width,
                    row.len()
                )));
            }
            for (j, &v) in row.iter().enumerate() {
                if !v.is_finite() {
                    return Err(AppError::NonFinite(format!(
                        "non-finite value in scaler input column {}",
                        j
                    )));
                }
                min[j] = min[j].min(v);
                max[j] = max[j].max(v);
            }
        }

        let range = min
            .iter()
            .zip(&max)
            .map(|(lo, hi)| if hi > lo { hi - lo } else { 1.0 })
            .collect();

        Ok(Self { min, range })
    }

    /// Fit on a single column of values.
    pub fn fit_column(values: &[f64]) -> Result<Self> {
        let rows: Vec<Vec<f64>> = values.iter().map(|v| vec![*v]).collect();
        Self::fit(&rows)
    }

    /// Fit on `data` and return it transformed.
    pub fn fit_transform(data: &[Vec<f64>]) -> Result<(Self, Vec<Vec<f64>>)> {
        let scaler = Self::fit(data)?;
        let scaled = scaler.transform(data)?;
        Ok((scaler, scaled))
    }

    pub fn width(&self) -> usize {
        self.min.len()
    }

    /// Apply the fitted transform without refitting.
    pub fn transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        data.iter().map(|row| self.transform_row(row)).collect()
    }

    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .enumerate()
            .map(|(j, v)| (v - self.min[j]) / self.range[j])
            .collect())
    }

    pub fn inverse_transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        data.iter().map(|row| self.inverse_transform_row(row)).collect()
    }

    pub fn inverse_transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .enumerate()
            .map(|(j, v)| v * self.range[j] + self.min[j])
            .collect())
    }

    /// Transform a single-column series.
    pub fn transform_column(&self, values: &[f64]) -> Result<Vec<f64>> {
        self.check_width(1)?;
        Ok(values.iter().map(|v| (v - self.min[0]) / self.range[0]).collect())
    }

    /// Invert a single scaled value of a single-column scaler.
    pub fn inverse_value(&self, value: f64) -> Result<f64> {
        self.check_width(1)?;
        Ok(value * self.range[0] + self.min[0])
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.width() {
            return Err(AppError::Internal(format!(
                "scaler fitted on {} columns, got {}",
                self.width(),
                width
            )));
        }
        Ok(())
    }
}

/// Independent scalers for features and target.
#[derive(Debug, Clone)]
pub struct ScalerPair {
    pub features: MinMaxScaler,
    pub target: MinMaxScaler,
}

/// Scaled training data together with the scalers that produced it.
#[derive(Debug, Clone)]
pub struct ScaledSet {
    pub scalers: ScalerPair,
    pub features: Vec<Vec<f64>>,
    pub target: Vec<f64>,
}

impl ScalerPair {
    /// Fit both scalers and scale the training data.
    pub fn fit(features: &[Vec<f64>], target: &[f64]) -> Result<ScaledSet> {
        let (feature_scaler, scaled_features) = MinMaxScaler::fit_transform(features)?;
        let target_scaler = MinMaxScaler::fit_column(target)?;
        let scaled_target = target_scaler.transform_column(target)?;

        Ok(ScaledSet {
            scalers: ScalerPair {
                features: feature_scaler,
                target: target_scaler,
            },
            features: scaled_features,
            target: scaled_target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 100.0, 5.0],
            vec![1.0, 150.0, 5.0],
            vec![2.0, 120.0, 5.0],
            vec![3.0, 200.0, 5.0],
        ]
    }

    #[test]
    fn test_fit_transform_bounds() {
        let (_, scaled) = MinMaxScaler::fit_transform(&sample()).unwrap();
        assert_relative_eq!(scaled[0][0], 0.0);
        assert_relative_eq!(scaled[3][0], 1.0);
        assert_relative_eq!(scaled[0][1], 0.0);
        assert_relative_eq!(scaled[1][1], 0.5);
        assert_relative_eq!(scaled[3][1], 1.0);
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let (_, scaled) = MinMaxScaler::fit_transform(&sample()).unwrap();
        assert!(scaled.iter().all(|row| row[2] == 0.0));
    }

    #[test]
    fn test_round_trip() {
        let data = sample();
        let (scaler, scaled) = MinMaxScaler::fit_transform(&data).unwrap();
        let restored = scaler.inverse_transform(&scaled).unwrap();
        for (a, b) in data.iter().flatten().zip(restored.iter().flatten()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_extrapolation_is_not_clamped() {
        let scaler = MinMaxScaler::fit(&sample()).unwrap();
        let row = scaler.transform_row(&[6.0, 250.0, 5.0]).unwrap();
        assert_relative_eq!(row[0], 2.0);
        assert!(row[1] > 1.0);
        assert_relative_eq!(scaler.inverse_transform_row(&row).unwrap()[1], 250.0);
    }

    #[test]
    fn test_column_scaler() {
        let scaler = MinMaxScaler::fit_column(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(scaler.transform_column(&[20.0]).unwrap(), vec![0.5]);
        assert_relative_eq!(scaler.inverse_value(1.5).unwrap(), 40.0);
        assert_relative_eq!(scaler.inverse_value(1.25).unwrap(), 35.0);
    }

    #[test]
    fn test_empty_data_is_rejected() {
        assert!(matches!(
            MinMaxScaler::fit(&[]),
            Err(AppError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_non_finite_is_rejected() {
        let data = vec![vec![1.0], vec![f64::NAN]];
        assert!(matches!(MinMaxScaler::fit(&data), Err(AppError::NonFinite(_))));
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let scaler = MinMaxScaler::fit(&sample()).unwrap();
        assert!(scaler.transform_row(&[1.0]).is_err());
        assert!(scaler.inverse_value(1.0).is_err());
    }

    #[test]
    fn test_scaler_pair_keeps_scalers_independent() {
        let features = sample();
        let target = vec![1000.0, 2000.0, 3000.0, 4000.0];
        let set = ScalerPair::fit(&features, &target).unwrap();
        assert_eq!(set.scalers.features.width(), 3);
        assert_eq!(set.scalers.target.width(), 1);
        assert_relative_eq!(set.target[1], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(set.scalers.target.inverse_value(set.target[2]).unwrap(), 3000.0);
    }
}
