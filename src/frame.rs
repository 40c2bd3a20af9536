//! Frames
//!
//! A [`Frame`] is an ordered set of named, equally long columns. Feature stages read their input
//! columns from a frame and append their output columns to it, so that the frame grows while it
//! travels through a pipeline.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use sprs::CsMat;

use crate::error::{Error, Result};

/// A single column of a [`Frame`]
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Nullable strings, used for categorical features
    Text(Vec<Option<String>>),
    /// Scalar numbers, a missing value is stored as `NaN`
    Numeric(Array1<f64>),
    /// Category codes together with the number of categories the codes can take
    Index {
        codes: Vec<usize>,
        n_categories: usize,
    },
    /// A sparse vector per row
    Sparse(CsMat<f64>),
    /// A dense vector per row
    Dense(Array2<f64>),
}

impl Column {
    /// Number of rows stored in this column
    pub fn nrows(&self) -> usize {
        match self {
            Column::Text(values) => values.len(),
            Column::Numeric(values) => values.len(),
            Column::Index { codes, .. } => codes.len(),
            Column::Sparse(matrix) => matrix.rows(),
            Column::Dense(matrix) => matrix.nrows(),
        }
    }

    /// Number of values per row, one for scalar columns
    pub fn width(&self) -> usize {
        match self {
            Column::Text(_) | Column::Numeric(_) | Column::Index { .. } => 1,
            Column::Sparse(matrix) => matrix.cols(),
            Column::Dense(matrix) => matrix.ncols(),
        }
    }

    /// Human readable name of the column kind
    pub fn kind(&self) -> &'static str {
        match self {
            Column::Text(_) => "text",
            Column::Numeric(_) => "numeric",
            Column::Index { .. } => "index",
            Column::Sparse(_) => "sparse vector",
            Column::Dense(_) => "dense vector",
        }
    }

    /// Keep only the rows at positions `rows`, in the given order
    pub fn take(&self, rows: &[usize]) -> Column {
        match self {
            Column::Text(values) => Column::Text(rows.iter().map(|&i| values[i].clone()).collect()),
            Column::Numeric(values) => Column::Numeric(values.select(Axis(0), rows)),
            Column::Index {
                codes,
                n_categories,
            } => Column::Index {
                codes: rows.iter().map(|&i| codes[i]).collect(),
                n_categories: *n_categories,
            },
            Column::Sparse(matrix) => {
                let mut indptr = Vec::with_capacity(rows.len() + 1);
                let mut indices = Vec::new();
                let mut data = Vec::new();
                indptr.push(0);
                for &row in rows {
                    if let Some(vec) = matrix.outer_view(row) {
                        for (col, &val) in vec.iter() {
                            indices.push(col);
                            data.push(val);
                        }
                    }
                    indptr.push(indices.len());
                }
                Column::Sparse(CsMat::new((rows.len(), matrix.cols()), indptr, indices, data))
            }
            Column::Dense(matrix) => Column::Dense(matrix.select(Axis(0), rows)),
        }
    }
}

/// An ordered collection of named columns with the same number of rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Frame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, replacing an existing column with the same name
    ///
    /// Returns an error if the column length differs from the number of rows of a non-empty
    /// frame.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if !self.columns.is_empty() && column.nrows() != self.nrows() {
            return Err(Error::LengthMismatch {
                name,
                expected: self.nrows(),
                found: column.nrows(),
            });
        }

        match self.names.iter().position(|n| *n == name) {
            Some(pos) => self.columns[pos] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
        Ok(())
    }

    /// Builder variant of [`insert`](Self::insert)
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        self.insert(name, column)?;
        Ok(self)
    }

    /// Number of rows, zero for a frame without columns
    pub fn nrows(&self) -> usize {
        self.columns.first().map(Column::nrows).unwrap_or(0)
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|pos| &self.columns[pos])
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn text(&self, name: &str) -> Result<&[Option<String>]> {
        match self.column(name)? {
            Column::Text(values) => Ok(values),
            other => Err(kind_error(name, "text", other)),
        }
    }

    pub fn numeric(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values.view()),
            other => Err(kind_error(name, "numeric", other)),
        }
    }

    /// Returns the codes of an index column and the number of categories
    pub fn index(&self, name: &str) -> Result<(&[usize], usize)> {
        match self.column(name)? {
            Column::Index {
                codes,
                n_categories,
            } => Ok((codes, *n_categories)),
            other => Err(kind_error(name, "index", other)),
        }
    }

    pub fn dense(&self, name: &str) -> Result<ArrayView2<'_, f64>> {
        match self.column(name)? {
            Column::Dense(values) => Ok(values.view()),
            other => Err(kind_error(name, "dense vector", other)),
        }
    }

    pub fn sparse(&self, name: &str) -> Result<&CsMat<f64>> {
        match self.column(name)? {
            Column::Sparse(values) => Ok(values),
            other => Err(kind_error(name, "sparse vector", other)),
        }
    }

    /// Numeric column with every value present
    ///
    /// Returns [`Error::NullValue`] for the first `NaN` found.
    pub fn complete_numeric(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let values = self.numeric(name)?;
        if let Some(row) = values.iter().position(|v| v.is_nan()) {
            return Err(Error::NullValue {
                column: name.to_string(),
                row,
            });
        }
        Ok(values)
    }

    /// New frame with the named columns, in the given order
    pub fn select(&self, names: &[&str]) -> Result<Frame> {
        let mut out = Frame::new();
        for name in names {
            out.insert(*name, self.column(name)?.clone())?;
        }
        Ok(out)
    }

    /// New frame that keeps the rows at positions `rows`
    pub fn take(&self, rows: &[usize]) -> Frame {
        Frame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
        }
    }

    /// New frame with the first `n` rows
    pub fn head(&self, n: usize) -> Frame {
        let rows: Vec<usize> = (0..n.min(self.nrows())).collect();
        self.take(&rows)
    }
}

fn kind_error(name: &str, expected: &'static str, found: &Column) -> Error {
    Error::ColumnKind {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}
