//! Mining task inputs

use crate::dataset::TrainingMatrix;
use serde::{Deserialize, Serialize};

/// Raw inputs for one mining run, tagged by workflow.
///
/// `labels` lists every attribute in order; the last one is the target. For
/// regression the target column lives in `training` with the features. For
/// classification it is supplied separately as `nominal`, one value per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum MiningTask {
    Regression {
        labels: Vec<String>,
        training: TrainingMatrix,
        test: Vec<f64>,
    },
    Classification {
        labels: Vec<String>,
        training: TrainingMatrix,
        test: Vec<f64>,
        nominal: Vec<String>,
    },
}

impl MiningTask {
    pub fn regression<S: Into<String>>(
        labels: impl IntoIterator<Item = S>,
        training: TrainingMatrix,
        test: Vec<f64>,
    ) -> Self {
        MiningTask::Regression {
            labels: labels.into_iter().map(Into::into).collect(),
            training,
            test,
        }
    }

    pub fn classification<S: Into<String>, N: Into<String>>(
        labels: impl IntoIterator<Item = S>,
        training: TrainingMatrix,
        test: Vec<f64>,
        nominal: impl IntoIterator<Item = N>,
    ) -> Self {
        MiningTask::Classification {
            labels: labels.into_iter().map(Into::into).collect(),
            training,
            test,
            nominal: nominal.into_iter().map(Into::into).collect(),
        }
    }

    pub fn labels(&self) -> &[String] {
        match self {
            MiningTask::Regression { labels, .. } | MiningTask::Classification { labels, .. } => labels,
        }
    }

    pub fn training(&self) -> &TrainingMatrix {
        match self {
            MiningTask::Regression { training, .. }
            | MiningTask::Classification { training, .. } => training,
        }
    }

    pub fn test(&self) -> &[f64] {
        match self {
            MiningTask::Regression { test, .. } | MiningTask::Classification { test, .. } => test,
        }
    }

    /// Nominal target values, classification only
    pub fn nominal(&self) -> Option<&[String]> {
        match self {
            MiningTask::Regression { .. } => None,
            MiningTask::Classification { nominal, .. } => Some(nominal),
        }
    }

    pub fn is_classification(&self) -> bool {
        matches!(self, MiningTask::Classification { .. })
    }
}
