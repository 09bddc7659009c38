//! Linear model implementations

use super::config::{ClassificationConfig, RegressionConfig};
use super::models::{FittedModel, Learner};
use crate::dataset::{PredictionRow, TrainingDataset};
use crate::error::{KolosalError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Solve symmetric positive-definite system Ax = b using Cholesky decomposition.
/// A non-PD matrix gets one small ridge on the diagonal before giving up.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    match cholesky_factor(a) {
        Some(l) => Some(cholesky_substitute(&l, b)),
        None => {
            let mut a_reg = a.clone();
            let ridge = 1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>() / n as f64;
            for k in 0..n {
                a_reg[[k, k]] += ridge;
            }
            cholesky_factor(&a_reg).map(|l| cholesky_substitute(&l, b))
        }
    }
}

/// Lower-triangular L with A = L * L^T, or None if A is not positive definite
fn cholesky_factor(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    Some(l)
}

fn cholesky_substitute(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = l.nrows();

    // Forward substitution: L * y = b
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    x
}

/// Matrix inversion using Gauss-Jordan elimination with partial pivoting (fallback)
fn matrix_inverse(m: &Array2<f64>) -> Option<Array2<f64>> {
    let n = m.nrows();
    if n != m.ncols() {
        return None;
    }

    // Augmented matrix [M | I]
    let mut aug = Array2::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = m[[i, j]];
        }
        aug[[i, n + i]] = 1.0;
    }

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }

        if max_row != col {
            for j in 0..2 * n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        if aug[[col, col]].abs() < 1e-10 {
            return None;
        }

        let pivot = aug[[col, col]];
        for j in 0..2 * n {
            aug[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..2 * n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    Some(aug.slice(ndarray::s![.., n..]).to_owned())
}

/// Solve (X^T X + alpha*I) w = X^T y, Cholesky first, Gauss-Jordan second
fn solve_normal_equations(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Option<Array1<f64>> {
    let mut xtx = x.t().dot(x);
    if alpha > 0.0 {
        for i in 0..xtx.nrows() {
            xtx[[i, i]] += alpha;
        }
    }
    let xty = x.t().dot(y);

    if let Some(result) = cholesky_solve(&xtx, &xty) {
        return Some(result);
    }

    matrix_inverse(&xtx).map(|inv| inv.dot(&xty))
}

/// Row-wise softmax, shifted by the row maximum for stability
fn softmax_rows(logits: &mut Array2<f64>) {
    for mut row in logits.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row /= sum;
    }
}

fn check_feature_count(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(KolosalError::ShapeError {
            expected: format!("{} features", expected),
            actual: format!("{} features", actual),
        });
    }
    Ok(())
}

/// Linear regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights)
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept (bias)
    pub intercept: Option<f64>,
    /// Whether to fit intercept
    pub fit_intercept: bool,
    /// Regularization strength (L2)
    pub alpha: f64,
    /// Whether model is fitted
    pub is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Create a new linear regression model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            alpha: 0.0,
            is_fitted: false,
        }
    }

    pub fn from_config(config: &RegressionConfig) -> Self {
        Self::new()
            .with_fit_intercept(config.fit_intercept)
            .with_alpha(config.alpha)
    }

    /// Enable/disable fitting intercept
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Set regularization strength (Ridge regression)
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fit the model to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();

        if n_samples != y.len() {
            return Err(KolosalError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(KolosalError::TrainingError(
                "cannot fit linear regression on an empty dataset".to_string(),
            ));
        }

        let (coefficients, intercept) = if self.fit_intercept {
            let x_mean = x
                .mean_axis(Axis(0))
                .ok_or_else(|| KolosalError::ComputationError("empty feature mean".to_string()))?;
            let y_mean = y.mean().unwrap_or(0.0);

            let x_centered = x - &x_mean.clone().insert_axis(Axis(0));
            let y_centered = y - y_mean;

            let coefficients = solve_normal_equations(&x_centered, &y_centered, self.alpha)
                .ok_or_else(|| {
                    KolosalError::ComputationError(
                        "Matrix is singular, cannot solve least squares".to_string(),
                    )
                })?;
            let intercept = y_mean - coefficients.dot(&x_mean);
            (coefficients, intercept)
        } else {
            let coefficients = solve_normal_equations(x, y, self.alpha).ok_or_else(|| {
                KolosalError::ComputationError(
                    "Matrix is singular, cannot solve least squares".to_string(),
                )
            })?;
            (coefficients, 0.0)
        };

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.is_fitted = true;

        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(KolosalError::ModelNotFitted),
        };
        check_feature_count(coefficients.len(), x.ncols())?;

        let intercept = self.intercept.unwrap_or(0.0);
        Ok(x.dot(coefficients) + intercept)
    }

    /// Get R² score
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        let y_mean = y.mean().unwrap_or(0.0);

        let ss_res: f64 = y.iter().zip(y_pred.iter()).map(|(t, p)| (t - p).powi(2)).sum();
        let ss_tot: f64 = y.iter().map(|t| (t - y_mean).powi(2)).sum();

        if ss_tot == 0.0 {
            return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
        }
        Ok(1.0 - ss_res / ss_tot)
    }
}

impl Learner for LinearRegression {
    type Model = LinearRegression;

    fn fit_dataset(&self, dataset: &TrainingDataset) -> Result<Self::Model> {
        if !dataset.schema().class_attribute().is_numeric() {
            return Err(KolosalError::TrainingError(format!(
                "linear regression needs a numeric target, '{}' is nominal",
                dataset.schema().class_attribute().name()
            )));
        }

        let mut model = self.clone();
        model.fit(&dataset.features(), &dataset.targets())?;
        Ok(model)
    }
}

impl FittedModel for LinearRegression {
    fn predict_row(&self, row: &PredictionRow) -> Result<f64> {
        let predictions = self.predict(&row.as_matrix())?;
        Ok(predictions[0])
    }
}

/// Multinomial logistic regression over class indices `0..n_classes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Fitted weights, one column per class
    pub coefficients: Option<Array2<f64>>,
    /// Fitted per-class intercepts
    pub intercepts: Option<Array1<f64>>,
    /// Per-feature mean used for standardization
    pub feature_mean: Option<Array1<f64>>,
    /// Per-feature scale used for standardization
    pub feature_scale: Option<Array1<f64>>,
    /// Number of classes seen at fit time
    pub n_classes: usize,
    /// Regularization strength (L2)
    pub alpha: f64,
    /// Maximum iterations
    pub max_iter: usize,
    /// Convergence tolerance
    pub tol: f64,
    /// Learning rate
    pub learning_rate: f64,
    /// Standardize features before fitting
    pub standardize: bool,
    /// Iterations used by the last fit
    pub n_iter: usize,
    /// Whether model is fitted
    pub is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Create a new logistic regression model
    pub fn new() -> Self {
        Self::from_config(&ClassificationConfig::default())
    }

    pub fn from_config(config: &ClassificationConfig) -> Self {
        Self {
            coefficients: None,
            intercepts: None,
            feature_mean: None,
            feature_scale: None,
            n_classes: 0,
            alpha: config.alpha,
            max_iter: config.max_iter,
            tol: config.tol,
            learning_rate: config.learning_rate,
            standardize: config.standardize,
            n_iter: 0,
            is_fitted: false,
        }
    }

    /// Set regularization strength
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set learning rate
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Fit using batch gradient descent on the softmax cross-entropy.
    /// `y` holds class indices in `0..n_classes`.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>, n_classes: usize) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(KolosalError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(KolosalError::TrainingError(
                "cannot fit logistic regression on an empty dataset".to_string(),
            ));
        }
        if n_classes == 0 {
            return Err(KolosalError::TrainingError("no classes to fit".to_string()));
        }

        // One-hot targets
        let mut targets = Array2::zeros((n_samples, n_classes));
        for (i, &label) in y.iter().enumerate() {
            if label < 0.0 || label.fract() != 0.0 || label as usize >= n_classes {
                return Err(KolosalError::TrainingError(format!(
                    "class label {} at row {} is outside 0..{}",
                    label, i, n_classes
                )));
            }
            targets[[i, label as usize]] = 1.0;
        }

        let (mean, scale) = if self.standardize {
            let mean = x
                .mean_axis(Axis(0))
                .ok_or_else(|| KolosalError::ComputationError("empty feature mean".to_string()))?;
            let scale = x
                .std_axis(Axis(0), 0.0)
                .mapv(|s| if s > f64::EPSILON { s } else { 1.0 });
            (mean, scale)
        } else {
            (Array1::zeros(n_features), Array1::ones(n_features))
        };
        let xs = (x - &mean.view().insert_axis(Axis(0))) / &scale.view().insert_axis(Axis(0));

        let mut weights: Array2<f64> = Array2::zeros((n_features, n_classes));
        let mut bias: Array1<f64> = Array1::zeros(n_classes);
        let lr = self.learning_rate;
        let mut converged = n_classes == 1;
        let mut iterations = 0;

        while !converged && iterations < self.max_iter {
            iterations += 1;

            let mut probs = xs.dot(&weights) + &bias;
            softmax_rows(&mut probs);
            let errors = probs - &targets;

            let dw = xs.t().dot(&errors) / n_samples as f64 + &weights * self.alpha;
            let db = errors
                .mean_axis(Axis(0))
                .ok_or_else(|| KolosalError::ComputationError("empty gradient".to_string()))?;

            let grad_norm = (dw.mapv(|v| v * v).sum() + db.mapv(|v| v * v).sum()).sqrt();
            if !grad_norm.is_finite() {
                return Err(KolosalError::ComputationError(
                    "gradient diverged during logistic regression".to_string(),
                ));
            }
            if grad_norm < self.tol {
                converged = true;
                break;
            }

            weights.scaled_add(-lr, &dw);
            bias.scaled_add(-lr, &db);
        }

        if !converged {
            warn!(
                max_iter = self.max_iter,
                "Logistic regression stopped before reaching tolerance"
            );
        }

        self.coefficients = Some(weights);
        self.intercepts = Some(bias);
        self.feature_mean = Some(mean);
        self.feature_scale = Some(scale);
        self.n_classes = n_classes;
        self.n_iter = iterations;
        self.is_fitted = true;

        Ok(self)
    }

    /// Class probabilities, one row per sample
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (weights, bias, mean, scale) = match (
            &self.coefficients,
            &self.intercepts,
            &self.feature_mean,
            &self.feature_scale,
        ) {
            (Some(w), Some(b), Some(m), Some(s)) if self.is_fitted => (w, b, m, s),
            _ => return Err(KolosalError::ModelNotFitted),
        };
        check_feature_count(weights.nrows(), x.ncols())?;

        let xs = (x - &mean.view().insert_axis(Axis(0))) / &scale.view().insert_axis(Axis(0));
        let mut probs = xs.dot(weights) + bias;
        softmax_rows(&mut probs);
        Ok(probs)
    }

    /// Predict class indices
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |best, (i, &p)| {
                        if p > best.1 {
                            (i, p)
                        } else {
                            best
                        }
                    })
                    .0 as f64
            })
            .collect())
    }

    /// Get accuracy score
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        if y.is_empty() {
            return Ok(0.0);
        }

        let correct = y_pred
            .iter()
            .zip(y.iter())
            .filter(|(pred, actual)| (*pred - *actual).abs() < 0.5)
            .count();

        Ok(correct as f64 / y.len() as f64)
    }
}

impl Learner for LogisticRegression {
    type Model = LogisticRegression;

    fn fit_dataset(&self, dataset: &TrainingDataset) -> Result<Self::Model> {
        let schema = dataset.schema();
        let domain = schema.class_domain().ok_or_else(|| {
            KolosalError::TrainingError(format!(
                "logistic regression needs a nominal target, '{}' is numeric",
                schema.class_attribute().name()
            ))
        })?;

        let mut model = self.clone();
        model.fit(&dataset.features(), &dataset.targets(), domain.len())?;
        Ok(model)
    }
}

impl FittedModel for LogisticRegression {
    fn predict_row(&self, row: &PredictionRow) -> Result<f64> {
        let predictions = self.predict(&row.as_matrix())?;
        Ok(predictions[0])
    }
}
