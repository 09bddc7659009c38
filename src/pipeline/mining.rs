//! Mining pipeline state machine

use super::task::MiningTask;
use crate::dataset::{
    assemble_prediction, assemble_training, PredictionRow, RowCount, TrainingDataset,
};
use crate::error::{KolosalError, Result};
use crate::schema::{build_schema, AttributeSchema, NominalDomain};
use crate::training::{Evaluator, MiningConfig, MiningResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Stages of a mining run, in the only order they can occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PipelineStage {
    Created,
    SchemaBuilt,
    SizesComputed,
    DatasetsAssembled,
    Evaluated,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Created => "created",
            PipelineStage::SchemaBuilt => "schema built",
            PipelineStage::SizesComputed => "sizes computed",
            PipelineStage::DatasetsAssembled => "datasets assembled",
            PipelineStage::Evaluated => "evaluated",
        };
        f.write_str(name)
    }
}

/// One regression or classification run over raw column data.
///
/// Construction does no work. [`step`](Self::step) advances exactly one stage
/// and [`run`](Self::run) drives the whole sequence. A failed step leaves the
/// pipeline at its last good stage; there is no retry.
#[derive(Debug)]
pub struct MiningPipeline {
    task: MiningTask,
    config: MiningConfig,
    stage: PipelineStage,
    schema: Option<AttributeSchema>,
    sizes: Option<RowCount>,
    training: Option<TrainingDataset>,
    prediction: Option<PredictionRow>,
    result: Option<MiningResult>,
}

impl MiningPipeline {
    /// Create a pipeline with default learner settings
    pub fn new(task: MiningTask) -> Self {
        Self::with_config(task, MiningConfig::default())
    }

    pub fn with_config(task: MiningTask, config: MiningConfig) -> Self {
        Self {
            task,
            config,
            stage: PipelineStage::Created,
            schema: None,
            sizes: None,
            training: None,
            prediction: None,
            result: None,
        }
    }

    pub fn task(&self) -> &MiningTask {
        &self.task
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn schema(&self) -> Option<&AttributeSchema> {
        self.schema.as_ref()
    }

    pub fn row_count(&self) -> Option<&RowCount> {
        self.sizes.as_ref()
    }

    pub fn training_dataset(&self) -> Option<&TrainingDataset> {
        self.training.as_ref()
    }

    pub fn prediction_row(&self) -> Option<&PredictionRow> {
        self.prediction.as_ref()
    }

    /// Result of a completed run
    pub fn result(&self) -> Option<&MiningResult> {
        self.result.as_ref()
    }

    /// Perform the next transition and return the stage reached
    pub fn step(&mut self) -> Result<PipelineStage> {
        match self.stage {
            PipelineStage::Created => self.resolve_schema()?,
            PipelineStage::SchemaBuilt => self.compute_sizes()?,
            PipelineStage::SizesComputed => self.assemble_datasets()?,
            PipelineStage::DatasetsAssembled => self.evaluate()?,
            PipelineStage::Evaluated => {
                return Err(KolosalError::InvalidState(
                    "pipeline has already been evaluated".to_string(),
                ))
            }
        }
        Ok(self.stage)
    }

    /// Drive every remaining transition and return the result
    pub fn run(mut self) -> Result<MiningResult> {
        while self.stage != PipelineStage::Evaluated {
            self.step()?;
        }
        self.result
            .ok_or_else(|| KolosalError::InvalidState("evaluation produced no result".to_string()))
    }

    fn resolve_schema(&mut self) -> Result<()> {
        self.config.validate()?;

        let domain = self.task.nominal().map(NominalDomain::from_values);
        let schema = build_schema(self.task.labels(), domain.as_ref())?;
        debug!(
            attributes = schema.len(),
            class_index = schema.class_index(),
            nominal = schema.class_attribute().is_nominal(),
            "Schema built"
        );

        self.schema = Some(schema);
        self.stage = PipelineStage::SchemaBuilt;
        Ok(())
    }

    fn compute_sizes(&mut self) -> Result<()> {
        let sizes = RowCount::compute(self.task.training(), self.task.nominal())?;
        debug!(
            row_size = sizes.row_size,
            columns = sizes.columns,
            rows_per_column = sizes.rows_per_column,
            "Row counts computed"
        );

        self.sizes = Some(sizes);
        self.stage = PipelineStage::SizesComputed;
        Ok(())
    }

    fn assemble_datasets(&mut self) -> Result<()> {
        let schema = self.schema.as_ref().ok_or_else(|| missing("schema"))?;
        let sizes = self.sizes.as_ref().ok_or_else(|| missing("row counts"))?;

        // the test vector is checked first so a bad query fails before any rows are built
        let prediction = assemble_prediction(schema, self.task.test())?;
        let training =
            assemble_training(schema, self.task.training(), self.task.nominal(), sizes)?;
        debug!(
            relation = training.relation(),
            rows = training.n_rows(),
            "Datasets assembled"
        );

        self.prediction = Some(prediction);
        self.training = Some(training);
        self.stage = PipelineStage::DatasetsAssembled;
        Ok(())
    }

    fn evaluate(&mut self) -> Result<()> {
        let training = self.training.as_ref().ok_or_else(|| missing("training dataset"))?;
        let prediction = self.prediction.as_ref().ok_or_else(|| missing("prediction row"))?;

        let evaluator = match &self.task {
            MiningTask::Regression { .. } => Evaluator::regression(&self.config),
            MiningTask::Classification { .. } => Evaluator::classification(&self.config),
        };
        let result = evaluator.evaluate(training, prediction)?;

        self.result = Some(result);
        self.stage = PipelineStage::Evaluated;
        Ok(())
    }
}

fn missing(what: &str) -> KolosalError {
    KolosalError::InvalidState(format!("{} not available at this stage", what))
}
