//! Error types for Kolosal mining

use thiserror::Error;

/// Result type alias for mining operations
pub type Result<T> = std::result::Result<T, KolosalError>;

/// Main error type for schema building, dataset assembly and evaluation
#[derive(Error, Debug)]
pub enum KolosalError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Size mismatch: {row_size} values over {columns} columns, {detail}")]
    SizeMismatch {
        row_size: usize,
        columns: usize,
        detail: String,
    },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Invalid pipeline state: {0}")]
    InvalidState(String),
}

impl From<polars::error::PolarsError> for KolosalError {
    fn from(err: polars::error::PolarsError) -> Self {
        KolosalError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for KolosalError {
    fn from(err: serde_json::Error) -> Self {
        KolosalError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for KolosalError {
    fn from(err: ndarray::ShapeError) -> Self {
        KolosalError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KolosalError::ConfigError("label set is empty".to_string());
        assert_eq!(err.to_string(), "Configuration error: label set is empty");
    }

    #[test]
    fn test_size_mismatch_display() {
        let err = KolosalError::SizeMismatch {
            row_size: 7,
            columns: 2,
            detail: "remainder 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Size mismatch: 7 values over 2 columns, remainder 1"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: KolosalError = io_err.into();
        assert!(matches!(err, KolosalError::IoError(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: KolosalError = json_err.into();
        assert!(matches!(err, KolosalError::SerializationError(_)));
    }
}
