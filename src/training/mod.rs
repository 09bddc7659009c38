//! Model training and evaluation
//!
//! Provides the learner seam used by the mining pipeline and the two
//! learners it ships with:
//! - Linear regression (OLS, optional L2) for numeric targets
//! - Multinomial logistic regression for nominal targets

mod config;
mod engine;
mod models;
pub mod linear_models;

pub use config::{ClassificationConfig, MiningConfig, RegressionConfig};
pub use engine::{decode_class, Evaluator, MiningResult};
pub use linear_models::{LinearRegression, LogisticRegression};
pub use models::{FittedModel, Learner};
