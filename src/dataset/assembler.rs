//! Training dataset and prediction row assembly

use super::matrix::TrainingMatrix;
use crate::error::{KolosalError, Result};
use crate::schema::{Attribute, AttributeSchema};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Row arithmetic for one assembly round.
///
/// `row_size` counts every value supplied, `columns` counts the columns those
/// values are spread over, and `rows_per_column` is their exact quotient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCount {
    pub row_size: usize,
    pub columns: usize,
    pub rows_per_column: usize,
}

impl RowCount {
    /// Compute row counts from the matrix, plus the nominal target list when
    /// classifying. Uneven division is an error, never a truncation.
    pub fn compute(matrix: &TrainingMatrix, nominal: Option<&[String]>) -> Result<Self> {
        let mut row_size = matrix.total_values();
        let mut columns = matrix.n_columns();
        if let Some(nominal) = nominal {
            row_size += nominal.len();
            columns += 1;
        }

        if columns == 0 {
            return Err(KolosalError::ConfigError(
                "no training columns supplied".to_string(),
            ));
        }

        let remainder = row_size % columns;
        if remainder != 0 {
            return Err(KolosalError::SizeMismatch {
                row_size,
                columns,
                detail: format!("{} values left over", remainder),
            });
        }

        Ok(Self {
            row_size,
            columns,
            rows_per_column: row_size / columns,
        })
    }
}

/// Labeled rows bound to a schema. Nominal targets are stored as their index
/// in the class domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDataset {
    relation: String,
    schema: AttributeSchema,
    rows: Array2<f64>,
}

impl TrainingDataset {
    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub fn class_index(&self) -> usize {
        self.schema.class_index()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.nrows() == 0
    }

    /// Full rows, features followed by the target
    pub fn rows(&self) -> &Array2<f64> {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.rows.nrows()).then(|| self.rows.row(index))
    }

    /// Feature columns only
    pub fn features(&self) -> Array2<f64> {
        self.rows
            .slice(ndarray::s![.., ..self.schema.class_index()])
            .to_owned()
    }

    /// Target column only
    pub fn targets(&self) -> Array1<f64> {
        self.rows.column(self.schema.class_index()).to_owned()
    }
}

/// Single unlabeled row bound to the same schema as its training dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRow {
    relation: String,
    schema: AttributeSchema,
    features: Array1<f64>,
    target: Option<f64>,
}

impl PredictionRow {
    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub fn class_index(&self) -> usize {
        self.schema.class_index()
    }

    pub fn features(&self) -> &Array1<f64> {
        &self.features
    }

    /// Target value, unset for a freshly assembled row
    pub fn target(&self) -> Option<f64> {
        self.target
    }

    /// Value of the attribute at `index`; `None` for the unset target or an
    /// out of range index
    pub fn value(&self, index: usize) -> Option<f64> {
        if index == self.schema.class_index() {
            self.target
        } else {
            self.features.get(index).copied()
        }
    }

    /// Features as a one-row matrix, the shape learners predict on
    pub fn as_matrix(&self) -> Array2<f64> {
        self.features.clone().insert_axis(ndarray::Axis(0))
    }
}

/// Build the training dataset for a schema.
///
/// Features are read from `matrix` by label. The target is read from the
/// matrix when it is numeric and from `nominal` when it is nominal.
pub fn assemble_training(
    schema: &AttributeSchema,
    matrix: &TrainingMatrix,
    nominal: Option<&[String]>,
    sizes: &RowCount,
) -> Result<TrainingDataset> {
    let n_rows = sizes.rows_per_column;
    let n_cols = schema.len();

    let mut columns: Vec<&[f64]> = Vec::with_capacity(n_cols);
    for attribute in schema.features() {
        columns.push(checked_column(matrix, attribute.name(), sizes)?);
    }

    let mut rows = Array2::zeros((n_rows, n_cols));
    for (c, column) in columns.iter().enumerate() {
        for (r, &value) in column.iter().enumerate() {
            ensure_finite(value, schema.attributes()[c].name(), r)?;
            rows[[r, c]] = value;
        }
    }

    let class_index = schema.class_index();
    match schema.class_attribute() {
        Attribute::Numeric { name } => {
            let column = checked_column(matrix, name, sizes)?;
            for (r, &value) in column.iter().enumerate() {
                ensure_finite(value, name, r)?;
                rows[[r, class_index]] = value;
            }
        }
        Attribute::Nominal { name, domain } => {
            let nominal = nominal.ok_or_else(|| {
                KolosalError::ConfigError(format!(
                    "nominal target '{}' needs a nominal training list",
                    name
                ))
            })?;
            check_length(name, nominal.len(), sizes)?;
            for (r, value) in nominal.iter().enumerate() {
                let index = domain.index_of(value).ok_or_else(|| {
                    KolosalError::ConfigError(format!(
                        "value '{}' is not in the domain of '{}'",
                        value, name
                    ))
                })?;
                rows[[r, class_index]] = index as f64;
            }
        }
    }

    Ok(TrainingDataset {
        relation: schema.training_relation(),
        schema: schema.clone(),
        rows,
    })
}

/// Build the prediction row from a flat test vector, one value per feature
/// in schema order. The target is left unset.
pub fn assemble_prediction(schema: &AttributeSchema, test: &[f64]) -> Result<PredictionRow> {
    let expected = schema.n_features();
    if test.len() != expected {
        return Err(KolosalError::ConfigError(format!(
            "test vector has {} values, expected {} (one per feature)",
            test.len(),
            expected
        )));
    }

    for (attribute, &value) in schema.features().iter().zip(test) {
        if !value.is_finite() {
            return Err(KolosalError::DataError(format!(
                "test value for '{}' is not finite",
                attribute.name()
            )));
        }
    }

    Ok(PredictionRow {
        relation: schema.testing_relation(),
        schema: schema.clone(),
        features: Array1::from_vec(test.to_vec()),
        target: None,
    })
}

fn checked_column<'a>(
    matrix: &'a TrainingMatrix,
    name: &str,
    sizes: &RowCount,
) -> Result<&'a [f64]> {
    let column = matrix.require(name)?;
    check_length(name, column.len(), sizes)?;
    Ok(column)
}

fn check_length(name: &str, len: usize, sizes: &RowCount) -> Result<()> {
    if len != sizes.rows_per_column {
        return Err(KolosalError::SizeMismatch {
            row_size: sizes.row_size,
            columns: sizes.columns,
            detail: format!(
                "column '{}' has {} rows, expected {}",
                name, len, sizes.rows_per_column
            ),
        });
    }
    Ok(())
}

fn ensure_finite(value: f64, name: &str, row: usize) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(KolosalError::DataError(format!(
            "column '{}' has a non-finite value at row {}",
            name, row
        )))
    }
}
