//! Error definitions for preprocessing
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PreprocessingError>;

#[derive(Error, Debug, Clone)]
pub enum PreprocessingError {
    #[error("label `{label}` in column `{column}` was not seen during fitting")]
    UnseenLabel { column: String, label: String },
    #[error("missing label in column `{column}` at row {row}")]
    MissingLabel { column: String, row: usize },
    #[error("no labels found in column `{0}`")]
    NoLabels(String),
    #[error("category code {code} in column `{column}` is out of range (< {n_categories})")]
    InvalidCategory {
        column: String,
        code: usize,
        n_categories: usize,
    },
    #[error("column `{column}` has width {found}, expected {expected}")]
    WidthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("vector assembler `{0}` needs at least one input column")]
    NoInputColumns(String),
    #[error("not enough samples")]
    NotEnoughSamples,
    #[error(transparent)]
    BaseCrate(#[from] fare::Error),
}
