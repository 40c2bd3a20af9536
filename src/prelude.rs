//! fare prelude.
//!
//! This module contains the most used types, type aliases, traits and
//! functions that you can import easily as a group.
//!

#[doc(no_inline)]
pub use crate::error::{Error, Result};

#[doc(no_inline)]
pub use crate::traits::*;

#[doc(no_inline)]
pub use crate::dataset::{Dataset, DatasetBase, DatasetView, Float};

#[doc(no_inline)]
pub use crate::frame::{Column, Frame};

#[doc(no_inline)]
pub use crate::pipeline::{FittedPipeline, Pipeline, Stage};

#[doc(no_inline)]
pub use crate::metrics_regression::{Regression, RegressionReport};

#[doc(no_inline)]
pub use crate::param_guard::ParamGuard;
