#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use fare::{Float, ParamGuard};

use crate::error::ElasticNetError;

use super::Result;

/// Optimization routine used to minimize the elastic net objective
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Solver {
    /// Coordinate descent on the normal equations. The Gram matrix `XᵀX` is computed once, every
    /// sweep then costs `O(n_features²)` independently of the number of samples.
    #[default]
    Normal,
    /// Coordinate descent on the residuals, stopped by the duality gap
    CoordinateDescent,
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// A verified hyper-parameter set ready for the estimation of a ElasticNet regression model
///
/// See [`ElasticNetParams`](crate::ElasticNetParams) for more information.
pub struct ElasticNetValidParams<F> {
    penalty: F,
    l1_ratio: F,
    with_intercept: bool,
    standardization: bool,
    max_iterations: u32,
    tolerance: F,
    solver: Solver,
}

impl<F: Float> ElasticNetValidParams<F> {
    pub fn penalty(&self) -> F {
        self.penalty
    }

    pub fn l1_ratio(&self) -> F {
        self.l1_ratio
    }

    pub fn with_intercept(&self) -> bool {
        self.with_intercept
    }

    pub fn standardization(&self) -> bool {
        self.standardization
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn solver(&self) -> Solver {
        self.solver
    }
}

/// A hyper-parameter set for Elastic-Net
///
/// Configures and minimizes the following objective function:
/// ```ignore
/// 1 / (2 * n_samples) * ||y - Xw - b||^2_2
///     + penalty * l1_ratio * ||w||_1
///     + 0.5 * penalty * (1 - l1_ratio) * ||w||^2_2
/// ```
///
/// The parameter set can be verified into a
/// [`ElasticNetValidParams`](crate::hyperparams::ElasticNetValidParams) by calling
/// [ParamGuard::check](Self::check). It is also possible to directly fit a model with
/// [Fit::fit](fare::traits::Fit::fit) which implicitely verifies the parameter set prior to the
/// model estimation and forwards any error.
///
/// # Parameters
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [penalty](Self::penalty) | `1.0` | Overall parameter penalty | `[0, inf)` |
/// | [l1_ratio](Self::l1_ratio) | `0.5` | Distribution of penalty to L1 and L2 regularizations | `[0.0, 1.0]` |
/// | [with_intercept](Self::with_intercept) | `true` | Enable intercept | `false`, `true` |
/// | [standardization](Self::standardization) | `true` | Penalize coefficients of standardized features | `false`, `true` |
/// | [tolerance](Self::tolerance) | `1e-6` | Relative change of the parameters | `(0, inf)` |
/// | [max_iterations](Self::max_iterations) | `100` | Maximum number of iterations | `[1, inf)` |
/// | [solver](Self::solver) | `Normal` | Optimization routine | [`Solver`] |
///
/// # Errors
///
/// The following errors can come from invalid hyper-parameters:
///
/// Returns [`InvalidPenalty`](ElasticNetError::InvalidPenalty) if the penalty is negative.
///
/// Returns [`InvalidL1Ratio`](ElasticNetError::InvalidL1Ratio) if the L1 ratio is not in unit
/// range.
///
/// Returns [`InvalidTolerance`](ElasticNetError::InvalidTolerance) if the tolerance is not
/// positive.
///
/// Returns [`InvalidMaxIterations`](ElasticNetError::InvalidMaxIterations) if no iteration is
/// allowed.
///
/// # Example
///
/// ```rust
/// use fare_elasticnet::{ElasticNetParams, ElasticNetError};
/// use fare::prelude::*;
/// use ndarray::array;
///
/// let ds = Dataset::new(array![[1.0, 0.0], [0.0, 1.0]], array![3.0, 2.0]);
///
/// // create a new parameter set with penalty equals `1e-5`
/// let unchecked_params = ElasticNetParams::new()
///     .penalty(1e-5);
///
/// // fit model with unchecked parameter set
/// let model = unchecked_params.fit(&ds)?;
///
/// // transform into a verified parameter set
/// let checked_params = unchecked_params.check()?;
///
/// // Regenerate model with the verified parameters, this only returns
/// // errors originating from the fitting process
/// let model = checked_params.fit(&ds)?;
/// # Ok::<(), ElasticNetError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ElasticNetParams<F>(ElasticNetValidParams<F>);

impl<F: Float> Default for ElasticNetParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configure and fit a Elastic Net model
impl<F: Float> ElasticNetParams<F> {
    /// Create default elastic net hyper parameters
    ///
    /// By default, an intercept will be fitted and the penalty applies to the coefficients of
    /// standardized features. The returned coefficients are always on the original scale.
    pub fn new() -> ElasticNetParams<F> {
        Self(ElasticNetValidParams {
            penalty: F::one(),
            l1_ratio: F::cast(0.5),
            with_intercept: true,
            standardization: true,
            max_iterations: 100,
            tolerance: F::cast(1e-6),
            solver: Solver::Normal,
        })
    }

    /// Set the overall parameter penalty parameter of the elastic net, otherwise known as the
    /// regularization strength. Use `l1_ratio` to configure how the penalty distributed to L1
    /// and L2 regularization.
    pub fn penalty(mut self, penalty: F) -> Self {
        self.0.penalty = penalty;
        self
    }

    /// Set l1_ratio parameter of the elastic net, otherwise known as the mixing parameter.
    /// Controls how the parameter penalty is distributed to L1 and L2 regularization.
    /// Setting `l1_ratio` to 1.0 is equivalent to a "Lasso" penalization,
    /// setting it to 0.0 is equivalent to "Ridge" penalization.
    ///
    /// Defaults to `0.5` if not set
    ///
    /// `l1_ratio` must be between `0.0` and `1.0`.
    pub fn l1_ratio(mut self, l1_ratio: F) -> Self {
        self.0.l1_ratio = l1_ratio;
        self
    }

    /// Configure the elastic net model to fit an intercept.
    /// Defaults to `true` if not set.
    pub fn with_intercept(mut self, with_intercept: bool) -> Self {
        self.0.with_intercept = with_intercept;
        self
    }

    /// Scale every feature to unit variance before optimizing, so that the penalty treats all
    /// features alike. Defaults to `true` if not set.
    pub fn standardization(mut self, standardization: bool) -> Self {
        self.0.standardization = standardization;
        self
    }

    /// Set the tolerance which is the minimum change of the parameters, relative to the largest
    /// parameter, needed for the optimization to continue.
    ///
    /// Defaults to `1e-6` if not set
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Set the maximum number of iterations for the optimization routine.
    ///
    /// Defaults to `100` if not set
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Defaults to [`Solver::Normal`] if not set
    pub fn solver(mut self, solver: Solver) -> Self {
        self.0.solver = solver;
        self
    }
}

impl<F: Float> ParamGuard for ElasticNetParams<F> {
    type Checked = ElasticNetValidParams<F>;
    type Error = ElasticNetError;

    /// Validate the hyper parameters
    fn check_ref(&self) -> Result<&Self::Checked> {
        if !self.0.penalty.is_finite() || self.0.penalty < F::zero() {
            Err(ElasticNetError::InvalidPenalty(to_f32(self.0.penalty)))
        } else if !(F::zero()..=F::one()).contains(&self.0.l1_ratio) {
            Err(ElasticNetError::InvalidL1Ratio(to_f32(self.0.l1_ratio)))
        } else if !self.0.tolerance.is_finite() || self.0.tolerance <= F::zero() {
            Err(ElasticNetError::InvalidTolerance(to_f32(self.0.tolerance)))
        } else if self.0.max_iterations == 0 {
            Err(ElasticNetError::InvalidMaxIterations)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

fn to_f32<F: Float>(value: F) -> f32 {
    value.to_f32().unwrap_or(f32::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = ElasticNetParams::<f64>::default().check().unwrap();
        assert_eq!(params.max_iterations(), 100);
        assert_eq!(params.solver(), Solver::Normal);
        assert!(params.standardization());
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(matches!(
            ElasticNetParams::new().penalty(-1.0f64).check(),
            Err(ElasticNetError::InvalidPenalty(_))
        ));
        assert!(matches!(
            ElasticNetParams::new().penalty(f64::NAN).check(),
            Err(ElasticNetError::InvalidPenalty(_))
        ));
        assert!(matches!(
            ElasticNetParams::new().l1_ratio(1.5f64).check(),
            Err(ElasticNetError::InvalidL1Ratio(_))
        ));
        assert!(matches!(
            ElasticNetParams::new().tolerance(0.0f64).check(),
            Err(ElasticNetError::InvalidTolerance(_))
        ));
        assert!(matches!(
            ElasticNetParams::<f64>::new().max_iterations(0).check(),
            Err(ElasticNetError::InvalidMaxIterations)
        ));
    }

    #[test]
    fn values_are_passed_unchanged() {
        let params = ElasticNetParams::new()
            .penalty(0.3f64)
            .l1_ratio(0.7)
            .max_iterations(50)
            .check()
            .unwrap();
        assert_eq!(params.penalty(), 0.3);
        assert_eq!(params.l1_ratio(), 0.7);
        assert_eq!(params.max_iterations(), 50);
    }
}
