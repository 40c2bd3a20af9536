//! `fare` provides the building blocks for training regression models on tabular trip data
//! with Rust.
//!
//! The crate holds the pieces every other crate of the workspace agrees on:
//!
//! * [`Frame`](frame::Frame), an in-memory set of named columns that feature stages read
//!   from and write to,
//! * the [`Pipeline`](pipeline::Pipeline) that chains feature stages and fits them one after
//!   the other,
//! * the [`Dataset`] handed to estimators once a frame has been turned into a feature matrix,
//! * the [`Fit`](traits::Fit), [`Transformer`](traits::Transformer) and
//!   [`Predict`](traits::Predict) traits, together with the [`ParamGuard`] checked
//!   hyperparameter pattern,
//! * common regression metrics.
//!
//! The actual stages live in `fare-preprocessing`, the estimator in `fare-elasticnet` and the
//! data loaders in `fare-datasets`.

pub mod dataset;
pub mod error;
pub mod frame;
mod metrics_regression;
mod param_guard;
pub mod pipeline;
pub mod prelude;
pub mod traits;

#[cfg(feature = "benchmarks")]
pub mod benchmarks;

pub use dataset::{Dataset, DatasetBase, DatasetView, Float};
pub use error::Error;
pub use param_guard::ParamGuard;

/// Common metrics functions for regression
pub mod metrics {
    pub use crate::metrics_regression::{Regression, RegressionReport};
}
