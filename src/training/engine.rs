//! Single-shot evaluation engine

use super::config::MiningConfig;
use super::linear_models::{LinearRegression, LogisticRegression};
use super::models::{FittedModel, Learner};
use crate::dataset::{PredictionRow, TrainingDataset};
use crate::error::{KolosalError, Result};
use crate::schema::NominalDomain;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of one fit/predict cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningResult {
    /// Raw model output: the prediction for regression, the class index for
    /// classification
    pub result: f64,
    /// Decoded class label, classification only
    pub class_predicted: Option<String>,
}

impl MiningResult {
    pub fn result(&self) -> f64 {
        self.result
    }

    pub fn class_predicted(&self) -> Option<&str> {
        self.class_predicted.as_deref()
    }
}

/// Which learner evaluates the assembled data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Evaluator {
    Regression(LinearRegression),
    Classification(LogisticRegression),
}

impl Evaluator {
    pub fn regression(config: &MiningConfig) -> Self {
        Evaluator::Regression(LinearRegression::from_config(&config.regression))
    }

    pub fn classification(config: &MiningConfig) -> Self {
        Evaluator::Classification(LogisticRegression::from_config(&config.classification))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Evaluator::Regression(_) => "regression",
            Evaluator::Classification(_) => "classification",
        }
    }

    /// Fit on `dataset` and predict `row`, one attempt each.
    pub fn evaluate(&self, dataset: &TrainingDataset, row: &PredictionRow) -> Result<MiningResult> {
        if dataset.schema() != row.schema() {
            return Err(KolosalError::ConfigError(
                "prediction row and training dataset use different schemas".to_string(),
            ));
        }

        let start = Instant::now();
        let result = match self {
            Evaluator::Regression(learner) => {
                let score = fit_and_predict(learner, dataset, row)?;
                MiningResult {
                    result: score,
                    class_predicted: None,
                }
            }
            Evaluator::Classification(learner) => {
                let domain = dataset.schema().class_domain().ok_or_else(|| {
                    KolosalError::TrainingError(
                        "classification needs a nominal target attribute".to_string(),
                    )
                })?;
                let index = fit_and_predict(learner, dataset, row)?;
                let label = decode_class(domain, index)?;
                MiningResult {
                    result: index,
                    class_predicted: Some(label),
                }
            }
        };

        info!(
            evaluator = self.name(),
            relation = dataset.relation(),
            rows = dataset.n_rows(),
            result = result.result,
            class_predicted = ?result.class_predicted,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Evaluation complete"
        );

        Ok(result)
    }
}

fn fit_and_predict<L: Learner>(
    learner: &L,
    dataset: &TrainingDataset,
    row: &PredictionRow,
) -> Result<f64> {
    let model = learner.fit_dataset(dataset)?;
    debug!(relation = dataset.relation(), rows = dataset.n_rows(), "Model fitted");
    model.predict_row(row)
}

/// Map a raw class output back to its label in the target domain
pub fn decode_class(domain: &NominalDomain, raw: f64) -> Result<String> {
    if !raw.is_finite() {
        return Err(KolosalError::InferenceError(format!(
            "class output {} is not finite",
            raw
        )));
    }

    let rounded = raw.round();
    if rounded < 0.0 || rounded >= domain.len() as f64 {
        return Err(KolosalError::InferenceError(format!(
            "class index {} is outside a domain of {} values",
            rounded,
            domain.len()
        )));
    }

    domain
        .value(rounded as usize)
        .map(str::to_string)
        .ok_or_else(|| KolosalError::InferenceError(format!("no class at index {}", rounded)))
}
