//! Column-oriented training input

use crate::error::{KolosalError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named numeric columns, one entry per attribute that is read from numeric data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainingMatrix {
    columns: HashMap<String, Vec<f64>>,
}

impl TrainingMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a column
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.insert(name, values);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> Option<Vec<f64>> {
        self.columns.insert(name.into(), values)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column lookup that treats a missing name as a configuration fault
    pub fn require(&self, name: &str) -> Result<&[f64]> {
        self.column(name)
            .ok_or_else(|| KolosalError::FeatureNotFound(name.to_string()))
    }

    /// Number of distinct column names
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Total number of values across all columns
    pub fn total_values(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Pull the named columns out of a DataFrame, casting each to Float64.
    /// Nulls are rejected rather than imputed.
    pub fn from_dataframe(df: &DataFrame, columns: &[&str]) -> Result<Self> {
        let mut matrix = Self::new();
        for &name in columns {
            let column = df
                .column(name)
                .map_err(|_| KolosalError::FeatureNotFound(name.to_string()))?;
            let column_f64 = column
                .cast(&DataType::Float64)
                .map_err(|e| KolosalError::DataError(e.to_string()))?;
            let values = column_f64
                .f64()
                .map_err(|e| KolosalError::DataError(e.to_string()))?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    v.ok_or_else(|| {
                        KolosalError::DataError(format!(
                            "column '{}' has a null at row {}",
                            name, row
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            matrix.insert(name, values);
        }
        Ok(matrix)
    }
}

impl From<HashMap<String, Vec<f64>>> for TrainingMatrix {
    fn from(columns: HashMap<String, Vec<f64>>) -> Self {
        Self { columns }
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<f64>)> for TrainingMatrix {
    fn from_iter<I: IntoIterator<Item = (S, Vec<f64>)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_totals() {
        let matrix = TrainingMatrix::new()
            .with_column("a", vec![1.0, 2.0, 3.0])
            .with_column("b", vec![4.0, 5.0, 6.0]);

        assert_eq!(matrix.n_columns(), 2);
        assert_eq!(matrix.total_values(), 6);
        assert_eq!(matrix.column("b"), Some(&[4.0, 5.0, 6.0][..]));
    }

    #[test]
    fn test_require_missing_column() {
        let matrix = TrainingMatrix::new();
        let err = matrix.require("nope").unwrap_err();
        assert!(matches!(err, KolosalError::FeatureNotFound(name) if name == "nope"));
    }

    #[test]
    fn test_from_dataframe_casts_integers() {
        let df = df!(
            "x" => &[1i64, 2, 3],
            "y" => &[0.5, 1.0, 1.5],
            "ignored" => &["a", "b", "c"]
        )
        .unwrap();

        let matrix = TrainingMatrix::from_dataframe(&df, &["x", "y"]).unwrap();
        assert_eq!(matrix.n_columns(), 2);
        assert_eq!(matrix.column("x"), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(matrix.column("y"), Some(&[0.5, 1.0, 1.5][..]));
    }

    #[test]
    fn test_from_dataframe_missing_column() {
        let df = df!("x" => &[1.0, 2.0]).unwrap();
        let err = TrainingMatrix::from_dataframe(&df, &["z"]).unwrap_err();
        assert!(matches!(err, KolosalError::FeatureNotFound(_)));
    }

    #[test]
    fn test_from_dataframe_rejects_nulls() {
        let df = df!("x" => &[Some(1.0), None, Some(3.0)]).unwrap();
        let err = TrainingMatrix::from_dataframe(&df, &["x"]).unwrap_err();
        assert!(matches!(err, KolosalError::DataError(_)));
    }

    #[test]
    fn test_serde_transparent() {
        let matrix: TrainingMatrix = serde_json::from_str(r#"{"x": [1.0, 2.0]}"#).unwrap();
        assert_eq!(matrix.column("x"), Some(&[1.0, 2.0][..]));
    }
}
