//! Dataset assembly
//!
//! Turns column-oriented training data into a labeled [`TrainingDataset`] and
//! a flat test vector into the single [`PredictionRow`] a model is asked about.

mod assembler;
mod matrix;

pub use assembler::{assemble_prediction, assemble_training, PredictionRow, RowCount, TrainingDataset};
pub use matrix::TrainingMatrix;
