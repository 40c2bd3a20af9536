//! `fare-datasets` reads the inputs of a training run and turns them into
//! [`Frame`](fare::frame::Frame)s.
//!
//! ## The Big Picture
//!
//! `fare-datasets` is a crate of the taxi fare workspace. Trip records arrive as parquet data,
//! either a single file or a directory of part files as written by distributed query engines,
//! and the regularization hyperparameters as a small CSV file.
//!
//! ## Current State
//!
//! * [`load_parquet`]: read a parquet file or a directory of part files into a polars
//!   `DataFrame`
//! * [`to_frame`]: select categorical, numeric and label columns and cast them
//! * [`load_hyperparameters`]: first row of a hyperparameter CSV
//! * [`generate`]: synthetic trip records for tests and benchmarks

mod error;
pub mod generate;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fare::frame::{Column, Frame};
use ndarray::Array1;
use polars::prelude::{DataFrame, DataType, ParquetReader, ParquetWriter, SerReader};
use serde::{Deserialize, Serialize};

pub use error::{DatasetError, Result};

/// Hyperparameters of the elastic net, as found by an earlier tuning run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Elastic net mixing, `1.0` is a pure L1 penalty
    pub alpha: f64,
    /// Regularization strength
    pub reg_param: f64,
}

/// Read parquet data from `path`
///
/// `path` is either a parquet file or a directory. For directories every `*.parquet` file is
/// read in file name order and the parts are stacked. Hidden files and files starting with `_`
/// (commit markers, checksums) are ignored.
pub fn load_parquet(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if path.is_file() {
        return read_part(path);
    }

    let parts = part_files(path)?;
    let mut parts = parts.iter();
    let first = parts
        .next()
        .ok_or_else(|| DatasetError::NoPartFiles(path.to_path_buf()))?;

    let mut df = read_part(first)?;
    for part in parts {
        df.vstack_mut(&read_part(part)?)?;
    }
    Ok(df)
}

/// Write `df` to a single parquet file
pub fn write_parquet(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ParquetWriter::new(&mut file).finish(df)?;
    Ok(())
}

fn read_part(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ParquetReader::new(file).finish()?)
}

fn part_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_error = |source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut parts = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(true, |name| name.starts_with('.') || name.starts_with('_'));
        let parquet = path.extension().map_or(false, |ext| ext == "parquet");
        if path.is_file() && parquet && !hidden {
            parts.push(path);
        }
    }
    parts.sort();
    Ok(parts)
}

/// Convert the columns of a polars `DataFrame` into a [`Frame`]
///
/// Categorical columns of any primitive type are cast to their string representation, numeric
/// columns and the label are cast to `f64` with missing values stored as `NaN`. Columns appear
/// in the frame in the order categorical, numeric, label.
pub fn to_frame<S: AsRef<str>>(
    df: &DataFrame,
    categorical: &[S],
    numeric: &[S],
    label: &str,
) -> Result<Frame> {
    let mut frame = Frame::new();
    for name in categorical.iter().map(AsRef::as_ref) {
        frame.insert(name, text_column(df, name)?)?;
    }
    for name in numeric.iter().map(AsRef::as_ref) {
        frame.insert(name, numeric_column(df, name)?)?;
    }
    frame.insert(label, numeric_column(df, label)?)?;
    Ok(frame)
}

fn text_column(df: &DataFrame, name: &str) -> Result<Column> {
    let casted = source_column(df, name)?.cast(&DataType::String)?;
    let values = casted
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(Column::Text(values))
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Column> {
    let casted = source_column(df, name)?.cast(&DataType::Float64)?;
    let values: Array1<f64> = casted
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect();
    Ok(Column::Numeric(values))
}

fn source_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a polars::prelude::Column> {
    if df.get_column_index(name).is_none() {
        return Err(fare::Error::MissingColumn(name.to_string()).into());
    }
    Ok(df.column(name)?)
}

/// Read the first data row of a CSV file with `alpha` and `reg_param` columns
///
/// Other columns, like an unnamed index column, are ignored.
pub fn load_hyperparameters(path: impl AsRef<Path>) -> Result<Hyperparameters> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    match reader.deserialize::<Hyperparameters>().next() {
        Some(row) => Ok(row?),
        None => Err(DatasetError::EmptyCsv(path.to_path_buf())),
    }
}
