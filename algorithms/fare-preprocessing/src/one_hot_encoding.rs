//! One-hot encoding of category codes

use fare::frame::{Column, Frame};
use fare::pipeline::Stage;
use fare::traits::Transformer;
use sprs::CsMat;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{PreprocessingError, Result};

/// One-hot encoder: turns an index column into a sparse indicator vector per row.
///
/// The vector width is taken from the index column, minus one if `drop_last` is set. Dropping
/// the last category keeps the encoded columns linearly independent; when the indexer kept an
/// extra bucket for invalid labels, that bucket is the one dropped, so unseen labels encode to
/// the zero vector.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct OneHotEncoder {
    input_col: String,
    output_col: String,
    drop_last: bool,
}

impl OneHotEncoder {
    pub fn new(input_col: impl Into<String>, output_col: impl Into<String>) -> Self {
        OneHotEncoder {
            input_col: input_col.into(),
            output_col: output_col.into(),
            drop_last: true,
        }
    }

    /// Defaults to `true`
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    pub fn fit(&self, frame: &Frame) -> Result<FittedOneHotEncoder> {
        let (_, n_categories) = frame.index(&self.input_col)?;

        Ok(FittedOneHotEncoder {
            input_col: self.input_col.clone(),
            output_col: self.output_col.clone(),
            drop_last: self.drop_last,
            n_categories,
        })
    }
}

/// The result of fitting a [`OneHotEncoder`]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct FittedOneHotEncoder {
    input_col: String,
    output_col: String,
    drop_last: bool,
    n_categories: usize,
}

impl FittedOneHotEncoder {
    /// Width of the encoded vectors
    pub fn size(&self) -> usize {
        if self.drop_last {
            self.n_categories.saturating_sub(1)
        } else {
            self.n_categories
        }
    }

    pub fn n_categories(&self) -> usize {
        self.n_categories
    }
}

impl Transformer<Frame, Result<Frame>> for FittedOneHotEncoder {
    fn transform(&self, frame: Frame) -> Result<Frame> {
        let (codes, _) = frame.index(&self.input_col)?;
        let size = self.size();

        let mut indptr = Vec::with_capacity(codes.len() + 1);
        let mut indices = Vec::with_capacity(codes.len());
        indptr.push(0);
        for &code in codes {
            if code >= self.n_categories {
                return Err(PreprocessingError::InvalidCategory {
                    column: self.input_col.clone(),
                    code,
                    n_categories: self.n_categories,
                });
            }
            // the dropped category stays an empty row
            if code < size {
                indices.push(code);
            }
            indptr.push(indices.len());
        }
        let data = vec![1.0; indices.len()];
        let encoded = CsMat::new((codes.len(), size), indptr, indices, data);

        Ok(frame.with_column(self.output_col.as_str(), Column::Sparse(encoded))?)
    }
}

impl Stage for OneHotEncoder {
    type Fitted = FittedOneHotEncoder;
    type Error = PreprocessingError;

    fn input_cols(&self) -> Vec<&str> {
        vec![self.input_col.as_str()]
    }

    fn output_cols(&self) -> Vec<&str> {
        vec![self.output_col.as_str()]
    }

    fn fit_stage(&self, frame: &Frame) -> Result<FittedOneHotEncoder> {
        self.fit(frame)
    }
}
