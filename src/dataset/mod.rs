//! Datasets
//!
//! This module implements the dataset struct handed to estimators once a frame has been
//! assembled into a feature matrix.
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix1, Ix2, ScalarOperand};

use num_traits::{AsPrimitive, FromPrimitive, NumAssignOps, NumCast};

use std::fmt;
use std::iter::Sum;

use crate::error::{Error, Result};

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used in records and targets of
/// a regression dataset.
pub trait Float:
    FromPrimitive
    + num_traits::Float
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + Sum
    + NumAssignOps
    + AsPrimitive<usize>
    + ScalarOperand
    + approx::AbsDiffEq<Epsilon = Self>
    + 'static
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// DatasetBase
///
/// A number of records about the data together with their targets and optional feature names.
///
/// # Fields
///
/// * `records`: a two-dimensional matrix with dimensionality (nsamples, nfeatures)
/// * `targets`: a one-dimensional array with dimensionality (nsamples)
/// * `feature_names`: optional descriptive feature names with dimensionality (nfeatures)
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBase<R, T> {
    pub records: R,
    pub targets: T,

    feature_names: Vec<String>,
}

/// Dataset
///
/// The most commonly used type of dataset. Records are stored as an `Array2` and every record
/// corresponds to a single continuous target.
pub type Dataset<F> = DatasetBase<Array2<F>, Array1<F>>;

/// DatasetView
///
/// A read only view of a Dataset
pub type DatasetView<'a, F> = DatasetBase<ArrayView2<'a, F>, ArrayView1<'a, F>>;

impl<R, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase {
            records,
            targets,
            feature_names: Vec::new(),
        }
    }

    /// Return references to the records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Return references to the targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> DatasetBase<R, T> {
        self.feature_names = names.into_iter().map(|x| x.into()).collect();
        self
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single feature.
    /// This allow the reader to understand its purpose while analysing results, for example
    /// correlation analysis or feature importance.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

impl<F, D, D2> DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D2, Ix1>>
where
    F: Float,
    D: Data<Elem = F>,
    D2: Data<Elem = F>,
{
    /// Number of samples, equal to the number of rows of the records
    pub fn nsamples(&self) -> usize {
        self.records.nrows()
    }

    /// Number of features, equal to the number of columns of the records
    pub fn nfeatures(&self) -> usize {
        self.records.ncols()
    }

    /// Creates a view of the dataset
    pub fn view(&self) -> DatasetView<'_, F> {
        DatasetBase {
            records: self.records.view(),
            targets: self.targets.view(),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Checks that there is exactly one target per record
    pub fn check_shapes(&self) -> Result<()> {
        if self.records.nrows() != self.targets.len() {
            return Err(Error::MismatchedShapes {
                records: self.records.nrows(),
                targets: self.targets.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn dataset_dimensions() {
        let ds = Dataset::new(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]], array![1.0, 2.0, 3.0])
            .with_feature_names(vec!["a", "b"]);

        assert_eq!(ds.nsamples(), 3);
        assert_eq!(ds.nfeatures(), 2);
        assert_eq!(ds.feature_names(), &["a".to_string(), "b".to_string()]);
        assert!(ds.check_shapes().is_ok());

        let view = ds.view();
        assert_eq!(view.nsamples(), 3);
        assert_eq!(view.feature_names().len(), 2);
    }

    #[test]
    fn mismatched_targets_are_rejected() {
        let ds = Dataset::new(array![[1.0], [2.0]], array![1.0]);
        assert!(matches!(
            ds.check_shapes(),
            Err(Error::MismatchedShapes {
                records: 2,
                targets: 1
            })
        ));
    }
}
