//! Provide traits for different classes of algorithms
//!

use crate::dataset::DatasetBase;
use ndarray::{ArrayBase, Data, Ix2};

/// Transformation algorithms
///
/// A transformer takes a dataset or a frame and transforms it into a different one. It has no
/// concept of state and provides therefore no method to predict new data. A typical example
/// are stages of a fitted feature pipeline.
pub trait Transformer<R, T> {
    fn transform(&self, x: R) -> T;
}

/// Fittable algorithms
///
/// A fittable algorithm takes a dataset and creates a concept of some kind about it. For
/// example the elastic net takes feature records and fare targets and learns a hyperplane
/// which is returned as the fitted object.
pub trait Fit<R, T, E: std::error::Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, dataset: &DatasetBase<R, T>) -> Result<Self::Object, E>;
}

/// Predict with model into a mutable reference of targets.
pub trait PredictInplace<R, T> {
    /// Predict something in place
    fn predict_inplace<'a>(&'a self, x: &'a R, y: &mut T);

    /// Create targets that `predict_inplace` works with.
    fn default_target(&self, x: &R) -> T;
}

/// Predict with model
///
/// This trait assumes the `PredictInplace` implementation and provides additional input/output
/// combinations.
///
/// # Provided implementation
///
/// * Array2 -> Array1/Array2
/// * Dataset -> Array1/Array2
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}

impl<'a, F, D, T, O> Predict<&'a ArrayBase<D, Ix2>, T> for O
where
    D: Data<Elem = F>,
    O: PredictInplace<ArrayBase<D, Ix2>, T>,
{
    fn predict(&self, records: &'a ArrayBase<D, Ix2>) -> T {
        let mut targets = self.default_target(records);
        self.predict_inplace(records, &mut targets);
        targets
    }
}

impl<'a, F, D, S, T, O> Predict<&'a DatasetBase<ArrayBase<D, Ix2>, S>, T> for O
where
    D: Data<Elem = F>,
    O: PredictInplace<ArrayBase<D, Ix2>, T>,
{
    fn predict(&self, ds: &'a DatasetBase<ArrayBase<D, Ix2>, S>) -> T {
        let mut targets = self.default_target(&ds.records);
        self.predict_inplace(&ds.records, &mut targets);
        targets
    }
}
