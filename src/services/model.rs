//! RBF-kernel support vector regression over scaled features.

use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::svm::svr::{SVRParameters, SVR};
use smartcore::svm::Kernels;
use tracing::debug;

use crate::error::{AppError, Result};

/// Anything that maps one scaled feature row to one scaled price.
pub trait Regressor {
    fn predict_one(&self, row: &[f64]) -> Result<f64>;
}

/// SVR hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSettings {
    /// Regularization strength.
    pub c: f64,
    /// Width of the insensitive tube around the target.
    pub epsilon: f64,
    /// Solver convergence tolerance.
    pub tol: f64,
    /// Fixed RBF gamma. `None` derives it from feature variance.
    pub gamma: Option<f64>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            c: 10.0,
            epsilon: 0.01,
            tol: 1e-3,
            gamma: None,
        }
    }
}

impl ModelSettings {
    /// Gamma to use for `features`: the fixed value if configured, otherwise
    /// `1 / (n_features * var(X))`.
    pub fn gamma_for(&self, features: &[Vec<f64>]) -> f64 {
        self.gamma.unwrap_or_else(|| adaptive_gamma(features))
    }

    /// Solver parameters for a fit on `features`.
    pub fn parameters(&self, features: &[Vec<f64>]) -> SVRParameters<f64> {
        let gamma = self.gamma_for(features);
        SVRParameters::default()
            .with_c(self.c)
            .with_eps(self.epsilon)
            .with_tol(self.tol)
            .with_kernel(Kernels::rbf().with_gamma(gamma))
    }
}

/// Kernel width scaled to the spread of the inputs. Falls back to 1.0 when
/// the matrix is empty or has no variance.
pub fn adaptive_gamma(features: &[Vec<f64>]) -> f64 {
    let values: Vec<f64> = features.iter().flatten().copied().collect();
    let n_features = features.first().map(|row| row.len()).unwrap_or(0);
    if values.is_empty() || n_features == 0 {
        return 1.0;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    if variance > 0.0 && variance.is_finite() {
        1.0 / (n_features as f64 * variance)
    } else {
        1.0
    }
}

/// Scaled training rows in the layout the solver consumes.
///
/// The fitted [`ForecastModel`] borrows this, so it must outlive the model.
pub struct TrainingMatrix {
    x: DenseMatrix<f64>,
    y: Vec<f64>,
    width: usize,
}

impl TrainingMatrix {
    pub fn new(features: &[Vec<f64>], target: &[f64]) -> Result<Self> {
        if features.is_empty() || features.len() != target.len() {
            return Err(AppError::InsufficientData(format!(
                "cannot fit model on {} rows and {} targets",
                features.len(),
                target.len()
            )));
        }

        Ok(Self {
            x: DenseMatrix::from_2d_vec(&features.to_vec()),
            y: target.to_vec(),
            width: features[0].len(),
        })
    }

    pub fn rows(&self) -> usize {
        self.y.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// A fitted SVR. Borrows its training matrix and solver parameters for its
/// whole life.
pub struct ForecastModel<'a> {
    svr: SVR<'a, f64, DenseMatrix<f64>, Vec<f64>>,
    width: usize,
}

impl<'a> ForecastModel<'a> {
    pub fn fit(data: &'a TrainingMatrix, parameters: &'a SVRParameters<f64>) -> Result<Self> {
        let svr = SVR::fit(&data.x, &data.y, parameters)
            .map_err(|e| AppError::Model(e.to_string()))?;

        debug!("Fitted SVR on {} rows x {} columns", data.rows(), data.width);
        Ok(Self {
            svr,
            width: data.width,
        })
    }
}

impl Regressor for ForecastModel<'_> {
    fn predict_one(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.width {
            return Err(AppError::Internal(format!(
                "model expects {} features, got {}",
                self.width,
                row.len()
            )));
        }
        let x = DenseMatrix::from_2d_vec(&vec![row.to_vec()]);
        let predictions = self
            .svr
            .predict(&x)
            .map_err(|e| AppError::Model(e.to_string()))?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| AppError::Model("model returned no prediction".into()))
    }
}
