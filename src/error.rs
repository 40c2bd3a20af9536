//! Error types in fare
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error("Not enough samples to compute the statistic")]
    NotEnoughSamples,
    #[error("column `{0}` not found in frame")]
    MissingColumn(String),
    #[error("column `{name}` has kind {found}, expected {expected}")]
    ColumnKind {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("column `{name}` has {found} rows, frame has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("missing value in column `{column}` at row {row}")]
    NullValue { column: String, row: usize },
    #[error("the number of records ({records}) does not match the number of targets ({targets})")]
    MismatchedShapes { records: usize, targets: usize },
}
