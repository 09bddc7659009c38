//! Kolosal Mining - schema-driven single-shot regression and classification
//!
//! This crate turns column-oriented training data and a flat feature vector
//! into a labeled dataset and a one-row query, fits a model and reports the
//! prediction.
//!
//! # Modules
//!
//! - [`schema`] - Attribute schemas (numeric and nominal attributes)
//! - [`dataset`] - Row counting and dataset/prediction-row assembly
//! - [`training`] - Learners, configuration and the evaluation engine
//! - [`pipeline`] - The staged mining pipeline
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```
//! use kolosal_mining::prelude::*;
//!
//! let training = TrainingMatrix::new()
//!     .with_column("x", vec![1.0, 2.0, 3.0, 4.0])
//!     .with_column("y", vec![2.0, 4.0, 6.0, 8.0]);
//! let task = MiningTask::regression(["x", "y"], training, vec![5.0]);
//!
//! let result = MiningPipeline::new(task).run()?;
//! assert!((result.result() - 10.0).abs() < 1e-6);
//! # Ok::<(), KolosalError>(())
//! ```

// Core error handling
pub mod error;

// Data shaping
pub mod schema;
pub mod dataset;

// Model fitting
pub mod training;

// Orchestration
pub mod pipeline;

// Services
pub mod cli;

pub use error::{KolosalError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{KolosalError, Result};
    pub use crate::schema::{build_schema, Attribute, AttributeSchema, NominalDomain};
    pub use crate::dataset::{PredictionRow, RowCount, TrainingDataset, TrainingMatrix};
    pub use crate::training::{Evaluator, MiningConfig, MiningResult, Learner, FittedModel};
    pub use crate::pipeline::{MiningPipeline, MiningTask, PipelineStage};
}
