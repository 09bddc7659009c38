//! Learner traits

use crate::dataset::{PredictionRow, TrainingDataset};
use crate::error::Result;

/// Something that can fit a model to a training dataset
pub trait Learner {
    type Model: FittedModel;

    /// Fit a model. The dataset is left untouched.
    fn fit_dataset(&self, dataset: &TrainingDataset) -> Result<Self::Model>;
}

/// A fitted model that scores one prediction row at a time.
///
/// Regression models return the predicted value. Classification models
/// return the index of the predicted class in the target domain.
pub trait FittedModel {
    fn predict_row(&self, row: &PredictionRow) -> Result<f64>;
}
