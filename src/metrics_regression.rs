//! Common metrics for regression
//!
//! This module implements common comparison metrices for continuous variables.

use ndarray::{ArrayBase, ArrayView1, Data, Ix1};
use std::fmt;

use crate::error::{Error, Result};
use crate::Float;

/// Regression metrices trait
///
/// Every metric fails with [`Error::NotEnoughSamples`] on empty input and with
/// [`Error::MismatchedShapes`] if both sides differ in length.
pub trait Regression<F: Float> {
    /// Maximal error between two continuous variables
    fn max_error(&self, compare_to: ArrayView1<F>) -> Result<F>;
    /// Mean error between two continuous variables
    fn mean_absolute_error(&self, compare_to: ArrayView1<F>) -> Result<F>;
    /// Mean squared error between two continuous variables
    fn mean_squared_error(&self, compare_to: ArrayView1<F>) -> Result<F>;
    /// Square root of the mean squared error
    fn root_mean_squared_error(&self, compare_to: ArrayView1<F>) -> Result<F> {
        self.mean_squared_error(compare_to).map(|mse| mse.sqrt())
    }
    /// R squared coefficient, is the proportion of the variance in the dependent variable that is
    /// predictable from the independent variable.
    ///
    /// To evaluate the accuracy of a prediction, use
    /// ```ignore
    /// prediction.r2(ground_truth.view())
    /// ```
    fn r2(&self, compare_to: ArrayView1<F>) -> Result<F>;
    /// Same as R-Squared but with biased variance
    fn explained_variance(&self, compare_to: ArrayView1<F>) -> Result<F>;
}

impl<F: Float, D: Data<Elem = F>> Regression<F> for ArrayBase<D, Ix1> {
    fn max_error(&self, compare_to: ArrayView1<F>) -> Result<F> {
        check(self.len(), compare_to.len())?;

        Ok((self - &compare_to)
            .iter()
            .map(|x| x.abs())
            .fold(F::neg_infinity(), F::max))
    }

    fn mean_absolute_error(&self, compare_to: ArrayView1<F>) -> Result<F> {
        check(self.len(), compare_to.len())?;

        (self - &compare_to)
            .mapv(|x| x.abs())
            .mean()
            .ok_or(Error::NotEnoughSamples)
    }

    fn mean_squared_error(&self, compare_to: ArrayView1<F>) -> Result<F> {
        check(self.len(), compare_to.len())?;

        (self - &compare_to)
            .mapv(|x| x * x)
            .mean()
            .ok_or(Error::NotEnoughSamples)
    }

    // r2 = 1 - sum((pred_i - y_i)^2)/sum((mean_y - y_i)^2)
    // the mean is taken of `compare_to`, the ground truth
    fn r2(&self, compare_to: ArrayView1<F>) -> Result<F> {
        check(self.len(), compare_to.len())?;
        let mean = compare_to.mean().ok_or(Error::NotEnoughSamples)?;

        Ok(F::one()
            - (self - &compare_to).mapv(|x| x * x).sum()
                / (compare_to.mapv(|x| (x - mean) * (x - mean)).sum() + F::cast(1e-10)))
    }

    fn explained_variance(&self, compare_to: ArrayView1<F>) -> Result<F> {
        check(self.len(), compare_to.len())?;
        let diff = self - &compare_to;

        let mean = compare_to.mean().ok_or(Error::NotEnoughSamples)?;
        let mean_error = diff.mean().ok_or(Error::NotEnoughSamples)?;

        Ok(F::one()
            - diff.mapv(|x| (x - mean_error) * (x - mean_error)).sum()
                / (compare_to.mapv(|x| (x - mean) * (x - mean)).sum() + F::cast(1e-10)))
    }
}

fn check(predictions: usize, truth: usize) -> Result<()> {
    if predictions != truth {
        Err(Error::MismatchedShapes {
            records: predictions,
            targets: truth,
        })
    } else if predictions == 0 {
        Err(Error::NotEnoughSamples)
    } else {
        Ok(())
    }
}

/// The metrics reported after scoring a model on a labelled frame
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionReport {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
    pub explained_variance: f64,
    pub max_error: f64,
}

impl RegressionReport {
    /// Compare `predictions` against the ground truth `targets`
    pub fn new<D: Data<Elem = f64>>(
        predictions: &ArrayBase<D, Ix1>,
        targets: ArrayView1<f64>,
    ) -> Result<Self> {
        Ok(RegressionReport {
            rmse: predictions.root_mean_squared_error(targets)?,
            mae: predictions.mean_absolute_error(targets)?,
            r2: predictions.r2(targets)?,
            explained_variance: predictions.explained_variance(targets)?,
            max_error: predictions.max_error(targets)?,
        })
    }
}

impl fmt::Display for RegressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rmse = {:.4}, mae = {:.4}, r2 = {:.4}, explained variance = {:.4}, max error = {:.4}",
            self.rmse, self.mae, self.r2, self.explained_variance, self.max_error
        )
    }
}
