//! Learner configuration

use crate::error::{KolosalError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the regression learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    /// Whether to fit an intercept
    pub fit_intercept: bool,
    /// L2 regularization strength (0 = ordinary least squares)
    pub alpha: f64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            alpha: 0.0,
        }
    }
}

/// Settings for the classification learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// L2 regularization strength on the weights
    pub alpha: f64,
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Maximum gradient descent iterations
    pub max_iter: usize,
    /// Stop once the gradient norm drops below this
    pub tol: f64,
    /// Standardize features before fitting
    pub standardize: bool,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            alpha: 1e-4,
            learning_rate: 0.5,
            max_iter: 2000,
            tol: 1e-6,
            standardize: true,
        }
    }
}

/// Configuration for a mining run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub regression: RegressionConfig,
    pub classification: ClassificationConfig,
}

impl MiningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the regression learner settings
    pub fn with_regression(mut self, regression: RegressionConfig) -> Self {
        self.regression = regression;
        self
    }

    /// Set the classification learner settings
    pub fn with_classification(mut self, classification: ClassificationConfig) -> Self {
        self.classification = classification;
        self
    }

    /// Set regression L2 strength
    pub fn with_regression_alpha(mut self, alpha: f64) -> Self {
        self.regression.alpha = alpha;
        self
    }

    /// Set maximum classifier iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.classification.max_iter = max_iter;
        self
    }

    /// Set classifier learning rate
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.classification.learning_rate = lr;
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save the configuration to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check hyperparameters are usable
    pub fn validate(&self) -> Result<()> {
        if !(self.regression.alpha >= 0.0) {
            return Err(invalid("regression.alpha", self.regression.alpha, "must be >= 0"));
        }
        let c = &self.classification;
        if !(c.alpha >= 0.0) {
            return Err(invalid("classification.alpha", c.alpha, "must be >= 0"));
        }
        if !(c.learning_rate > 0.0) {
            return Err(invalid("classification.learning_rate", c.learning_rate, "must be > 0"));
        }
        if c.max_iter == 0 {
            return Err(invalid("classification.max_iter", c.max_iter, "must be at least 1"));
        }
        if !(c.tol >= 0.0) {
            return Err(invalid("classification.tol", c.tol, "must be >= 0"));
        }
        Ok(())
    }
}

fn invalid(name: &str, value: impl ToString, reason: &str) -> KolosalError {
    KolosalError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(MiningConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = MiningConfig::from_json(r#"{"classification": {"max_iter": 50}}"#).unwrap();
        assert_eq!(config.classification.max_iter, 50);
        assert_eq!(config.classification.learning_rate, 0.5);
        assert!(config.regression.fit_intercept);
    }

    #[test]
    fn test_invalid_learning_rate() {
        let err = MiningConfig::new().with_learning_rate(0.0).validate().unwrap_err();
        assert!(matches!(
            err,
            KolosalError::InvalidParameter { ref name, .. } if name == "classification.learning_rate"
        ));
    }

    #[test]
    fn test_nan_alpha_rejected() {
        let config = MiningConfig::new().with_regression_alpha(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mining.json");

        let config = MiningConfig::new().with_max_iter(123).with_regression_alpha(0.5);
        config.save(&path).unwrap();

        let loaded = MiningConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
