//! Mining pipeline
//!
//! Runs the fixed sequence build schema → compute sizes → assemble datasets →
//! evaluate for one regression or classification task.

mod mining;
mod task;

pub use mining::{MiningPipeline, PipelineStage};
pub use task::MiningTask;
