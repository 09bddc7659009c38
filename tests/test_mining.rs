//! Integration test: mining pipeline end-to-end

use kolosal_mining::dataset::{
    assemble_prediction, assemble_training, RowCount, TrainingMatrix,
};
use kolosal_mining::pipeline::{MiningPipeline, MiningTask};
use kolosal_mining::schema::{build_schema, Attribute};
use kolosal_mining::training::{Evaluator, MiningConfig};
use kolosal_mining::KolosalError;
use polars::prelude::*;

fn line_task() -> MiningTask {
    let training = TrainingMatrix::new()
        .with_column("x", vec![1.0, 2.0, 3.0, 4.0])
        .with_column("y", vec![2.0, 4.0, 6.0, 8.0]);
    MiningTask::regression(["x", "y"], training, vec![5.0])
}

fn low_high_task(test: f64) -> MiningTask {
    let training = TrainingMatrix::new().with_column("x", vec![1.0, 2.0, 8.0, 9.0]);
    MiningTask::classification(
        ["x", "cls"],
        training,
        vec![test],
        ["low", "low", "high", "high"],
    )
}

#[test]
fn test_regression_round_trip() {
    let result = MiningPipeline::new(line_task()).run().unwrap();
    assert!(
        (result.result() - 10.0).abs() < 1e-6,
        "y = 2x at x = 5 should be 10, got {}",
        result.result()
    );
    assert!(result.class_predicted().is_none());
}

#[test]
fn test_classification_round_trip() {
    let result = MiningPipeline::new(low_high_task(1.5)).run().unwrap();
    assert_eq!(result.class_predicted(), Some("low"));
    assert_eq!(result.result(), 0.0);
}

#[test]
fn test_classification_other_side() {
    let result = MiningPipeline::new(low_high_task(8.5)).run().unwrap();
    assert_eq!(result.class_predicted(), Some("high"));
}

#[test]
fn test_classification_three_classes() {
    let training = TrainingMatrix::new()
        .with_column("temp", vec![1.0, 2.0, 11.0, 12.0, 21.0, 22.0])
        .with_column("humidity", vec![0.5, 0.4, 0.5, 0.4, 0.5, 0.4]);
    let task = MiningTask::classification(
        ["temp", "humidity", "season"],
        training,
        vec![11.5, 0.45],
        ["winter", "winter", "spring", "spring", "summer", "summer"],
    );
    let config = MiningConfig::new().with_max_iter(5000);

    let result = MiningPipeline::with_config(task, config).run().unwrap();
    assert_eq!(result.class_predicted(), Some("spring"));
}

#[test]
fn test_decoded_class_is_in_domain() {
    for test in [0.0, 1.5, 5.0, 8.5, 20.0] {
        let result = MiningPipeline::new(low_high_task(test)).run().unwrap();
        let index = result.result().round();
        assert!(index == 0.0 || index == 1.0);
        let label = result.class_predicted().unwrap();
        assert!(label == "low" || label == "high");
    }
}

#[test]
fn test_runs_are_idempotent() {
    let first = MiningPipeline::new(line_task()).run().unwrap();
    let second = MiningPipeline::new(line_task()).run().unwrap();
    assert!((first.result() - second.result()).abs() < 1e-12);

    let first = MiningPipeline::new(low_high_task(3.0)).run().unwrap();
    let second = MiningPipeline::new(low_high_task(3.0)).run().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_schema_properties() {
    let mut pipeline = MiningPipeline::new(low_high_task(1.5));
    pipeline.step().unwrap();
    let schema = pipeline.schema().unwrap();

    assert_eq!(schema.len(), 2);
    assert_eq!(schema.class_index(), 1);
    assert!(schema.features().iter().all(Attribute::is_numeric));
    assert_eq!(schema.class_domain().unwrap().values(), &["low", "high"]);

    let mut pipeline = MiningPipeline::new(line_task());
    pipeline.step().unwrap();
    let schema = pipeline.schema().unwrap();
    assert!(schema.attributes().iter().all(Attribute::is_numeric));
    assert_eq!(schema.class_index(), schema.len() - 1);
}

#[test]
fn test_row_size_includes_nominal_list() {
    let mut pipeline = MiningPipeline::new(low_high_task(1.5));
    pipeline.step().unwrap();
    pipeline.step().unwrap();

    let sizes = pipeline.row_count().unwrap();
    assert_eq!(sizes.row_size, 8);
    assert_eq!(sizes.columns, 2);
    assert_eq!(sizes.rows_per_column, 4);
}

#[test]
fn test_prediction_row_matches_test_vector() {
    let training = TrainingMatrix::new()
        .with_column("a", vec![1.0, 2.0])
        .with_column("b", vec![3.0, 4.0])
        .with_column("y", vec![5.0, 6.0]);
    let task = MiningTask::regression(["b", "a", "y"], training, vec![30.0, 10.0]);
    let mut pipeline = MiningPipeline::new(task);
    for _ in 0..3 {
        pipeline.step().unwrap();
    }

    let row = pipeline.prediction_row().unwrap();
    assert_eq!(row.features().to_vec(), vec![30.0, 10.0]);
    assert_eq!(row.target(), None);

    // label order, not insertion order, decides column placement
    let dataset = pipeline.training_dataset().unwrap();
    assert_eq!(dataset.row(0).unwrap().to_vec(), vec![3.0, 1.0, 5.0]);
}

#[test]
fn test_empty_labels() {
    let task = MiningTask::regression(Vec::<String>::new(), TrainingMatrix::new(), vec![]);
    let err = MiningPipeline::new(task).run().unwrap_err();
    assert!(matches!(err, KolosalError::ConfigError(_)));
}

#[test]
fn test_test_vector_length_mismatch() {
    let training = TrainingMatrix::new()
        .with_column("x", vec![1.0, 2.0])
        .with_column("y", vec![2.0, 4.0]);
    let task = MiningTask::regression(["x", "y"], training, vec![1.0, 2.0]);
    let err = MiningPipeline::new(task).run().unwrap_err();
    assert!(matches!(err, KolosalError::ConfigError(_)));
}

#[test]
fn test_missing_training_column() {
    let training = TrainingMatrix::new()
        .with_column("x", vec![1.0, 2.0])
        .with_column("z", vec![2.0, 4.0]);
    let task = MiningTask::regression(["x", "y"], training, vec![1.0]);
    let err = MiningPipeline::new(task).run().unwrap_err();
    assert!(matches!(err, KolosalError::FeatureNotFound(name) if name == "y"));
}

#[test]
fn test_uneven_nominal_list() {
    let training = TrainingMatrix::new().with_column("x", vec![1.0, 2.0, 3.0]);
    let task = MiningTask::classification(["x", "cls"], training, vec![1.0], ["a", "b"]);
    let err = MiningPipeline::new(task).run().unwrap_err();
    assert!(matches!(err, KolosalError::SizeMismatch { row_size: 5, columns: 2, .. }));
}

#[test]
fn test_empty_training_data_fails_fit() {
    let training = TrainingMatrix::new()
        .with_column("x", vec![])
        .with_column("y", vec![]);
    let task = MiningTask::regression(["x", "y"], training, vec![1.0]);
    let err = MiningPipeline::new(task).run().unwrap_err();
    assert!(matches!(err, KolosalError::TrainingError(_)));
}

#[test]
fn test_manual_assembly_matches_pipeline() {
    let matrix = TrainingMatrix::new()
        .with_column("x", vec![1.0, 2.0, 3.0, 4.0])
        .with_column("y", vec![2.0, 4.0, 6.0, 8.0]);
    let schema = build_schema(&["x", "y"], None).unwrap();
    let sizes = RowCount::compute(&matrix, None).unwrap();
    let dataset = assemble_training(&schema, &matrix, None, &sizes).unwrap();
    let row = assemble_prediction(&schema, &[5.0]).unwrap();

    let manual = Evaluator::regression(&MiningConfig::default())
        .evaluate(&dataset, &row)
        .unwrap();
    let piped = MiningPipeline::new(line_task()).run().unwrap();
    assert!((manual.result() - piped.result()).abs() < 1e-12);
}

#[test]
fn test_training_matrix_from_dataframe() {
    let df = df!(
        "x1" => &[1.0, 2.0, 3.0, 4.0, 5.0],
        "x2" => &[1.0, 0.0, 1.0, 0.0, 1.0],
        "target" => &[3.0, 4.0, 7.0, 8.0, 11.0]
    )
    .unwrap();

    // target = 2*x1 + x2
    let training = TrainingMatrix::from_dataframe(&df, &["x1", "x2", "target"]).unwrap();
    let task = MiningTask::regression(["x1", "x2", "target"], training, vec![6.0, 0.0]);
    let result = MiningPipeline::new(task).run().unwrap();
    assert!((result.result() - 12.0).abs() < 1e-6, "got {}", result.result());
}

#[test]
fn test_task_from_json_request() {
    let json = r#"{
        "task": "regression",
        "labels": ["x", "y"],
        "training": {"x": [1.0, 2.0, 3.0], "y": [1.0, 3.0, 5.0]},
        "test": [4.0]
    }"#;
    let task: MiningTask = serde_json::from_str(json).unwrap();
    let result = MiningPipeline::new(task).run().unwrap();
    assert!((result.result() - 7.0).abs() < 1e-6);
}
