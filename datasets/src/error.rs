use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no parquet files found in {0}")]
    NoPartFiles(PathBuf),
    #[error("{0} contains no data rows")]
    EmptyCsv(PathBuf),
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    BaseCrate(#[from] fare::Error),
}
