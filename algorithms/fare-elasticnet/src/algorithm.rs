use approx::{abs_diff_eq, abs_diff_ne};
use ndarray::{s, Array1, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix1, Ix2};

use fare::traits::{Fit, PredictInplace};
use fare::{DatasetBase, Float};

use super::{ElasticNet, ElasticNetValidParams, Solver};
use crate::error::{ElasticNetError, Result};

impl<F, D, T> Fit<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>, ElasticNetError> for ElasticNetValidParams<F>
where
    F: Float,
    D: Data<Elem = F>,
    T: Data<Elem = F>,
{
    type Object = ElasticNet<F>;

    /// Fit an elastic net model given a feature matrix `x` and a target
    /// variable `y`.
    ///
    /// The feature matrix `x` must have shape `(n_samples, n_features)`
    ///
    /// The target variable `y` must have shape `(n_samples)`
    ///
    /// Returns a fitted `ElasticNet` object which contains the fitted
    /// parameters and can be used to `predict` values of the target variable
    /// for new feature values.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>) -> Result<Self::Object> {
        dataset.check_shapes()?;
        if dataset.nsamples() == 0 {
            return Err(ElasticNetError::NotEnoughSamples);
        }
        let x = dataset.records();
        let y = dataset.targets();

        let (x_offset, y_offset) = if self.with_intercept() {
            (
                x.mean_axis(Axis(0))
                    .ok_or(ElasticNetError::NotEnoughSamples)?,
                y.mean().ok_or(ElasticNetError::NotEnoughSamples)?,
            )
        } else {
            (Array1::zeros(x.ncols()), F::zero())
        };

        // factors mapping original features onto the optimization scale, constant features are
        // mapped to zero and keep a zero coefficient
        let scales = if self.standardization() {
            x.std_axis(Axis(0), F::zero())
                .mapv(|std| if abs_diff_eq!(std, F::zero()) { F::zero() } else { F::one() / std })
        } else {
            Array1::ones(x.ncols())
        };

        let x_scaled = (x - &x_offset) * &scales;
        let y_centered = y - y_offset;

        let (w, duality_gap, n_steps) = match self.solver() {
            Solver::Normal => normal_coordinate_descent(
                x_scaled.view(),
                y_centered.view(),
                self.tolerance(),
                self.max_iterations(),
                self.l1_ratio(),
                self.penalty(),
            ),
            Solver::CoordinateDescent => coordinate_descent(
                x_scaled.view(),
                y_centered.view(),
                self.tolerance(),
                self.max_iterations(),
                self.l1_ratio(),
                self.penalty(),
            ),
        };

        let hyperplane = w * &scales;
        let intercept = y_offset - x_offset.dot(&hyperplane);

        Ok(ElasticNet {
            hyperplane,
            intercept,
            duality_gap,
            n_steps,
        })
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>> for ElasticNet<F> {
    /// Given an input matrix `X`, with shape `(n_samples, n_features)`,
    /// `predict` returns the target variable according to elastic net
    /// learned from the training data distribution.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        *y = x.dot(&self.hyperplane) + self.intercept;
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

/// View the fitted parameters and make predictions with a fitted
/// elastic net model
impl<F: Float> ElasticNet<F> {
    /// Get the fitted hyperplane
    pub fn hyperplane(&self) -> &Array1<F> {
        &self.hyperplane
    }

    /// Get the fitted intercept, 0. if no intercept was fitted
    pub fn intercept(&self) -> F {
        self.intercept
    }

    /// Get the number of steps taken in optimization algorithm
    pub fn n_steps(&self) -> u32 {
        self.n_steps
    }

    /// Get the duality gap at the end of the optimization algorithm
    pub fn duality_gap(&self) -> F {
        self.duality_gap
    }

    /// Number of features the model was fitted on
    pub fn nfeatures(&self) -> usize {
        self.hyperplane.len()
    }

    /// Predict targets, failing instead of panicking when the width of `x` differs from the
    /// training records
    pub fn try_predict<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Result<Array1<F>> {
        if x.ncols() != self.nfeatures() {
            return Err(ElasticNetError::FeatureMismatch {
                expected: self.nfeatures(),
                found: x.ncols(),
            });
        }
        let mut y = self.default_target(x);
        self.predict_inplace(x, &mut y);
        Ok(y)
    }
}

fn soft_threshold<F: Float>(value: F, threshold: F) -> F {
    value.signum() * F::max(value.abs() - threshold, F::zero())
}

/// Coordinate descent on the normal equations
///
/// Works on the Gram matrix `XᵀX` and `Xᵀy` only. The update of coordinate `j` is the exact
/// minimizer of the objective with all other coordinates fixed,
/// `w_j = S(Xᵀy_j - Σ_{k≠j} G_jk w_k, n λ α) / (G_jj + n λ (1 - α))`.
fn normal_coordinate_descent<'a, F: Float>(
    x: ArrayView2<'a, F>,
    y: ArrayView1<'a, F>,
    tol: F,
    max_steps: u32,
    l1_ratio: F,
    penalty: F,
) -> (Array1<F>, F, u32) {
    let n_samples = F::cast(x.nrows());
    let n_features = x.ncols();
    let gram = x.t().dot(&x);
    let xty = x.t().dot(&y);
    let l1_reg = n_samples * l1_ratio * penalty;
    let l2_reg = n_samples * (F::one() - l1_ratio) * penalty;

    let mut w = Array1::<F>::zeros(n_features);
    let mut n_steps = 0u32;
    while n_steps < max_steps {
        let mut w_max = F::zero();
        let mut d_w_max = F::zero();
        for ii in 0..n_features {
            let g_ii = gram[(ii, ii)];
            if abs_diff_eq!(g_ii, F::zero()) {
                continue;
            }
            let w_ii = w[ii];
            let tmp = xty[ii] - gram.row(ii).dot(&w) + g_ii * w_ii;
            w[ii] = soft_threshold(tmp, l1_reg) / (g_ii + l2_reg);

            d_w_max = F::max(d_w_max, (w[ii] - w_ii).abs());
            w_max = F::max(w_max, w[ii].abs());
        }
        n_steps += 1;

        if abs_diff_eq!(w_max, F::zero()) || d_w_max / w_max < tol {
            break;
        }
    }

    let r = &y - &x.dot(&w);
    let gap = duality_gap(x.view(), y.view(), w.view(), r.view(), l1_ratio, penalty);
    (w, gap, n_steps)
}

fn coordinate_descent<'a, F: Float>(
    x: ArrayView2<'a, F>,
    y: ArrayView1<'a, F>,
    tol: F,
    max_steps: u32,
    l1_ratio: F,
    penalty: F,
) -> (Array1<F>, F, u32) {
    let n_samples = F::cast(x.nrows());
    let n_features = x.ncols();
    // the parameters of the model
    let mut w = Array1::<F>::zeros(n_features);
    // the residuals: `y - X*w` (since w=0, this is just `y` for now),
    // the residuals are updated during the algorithm as the parameters change
    let mut r = y.to_owned();
    let mut n_steps = 0u32;
    let norm_cols_x = x.map_axis(Axis(0), |col| col.dot(&col));
    let mut gap = F::one() + tol;
    let d_w_tol = tol;
    let tol = tol * y.dot(&y);
    while n_steps < max_steps {
        let mut w_max = F::zero();
        let mut d_w_max = F::zero();
        for ii in 0..n_features {
            if abs_diff_eq!(norm_cols_x[ii], F::zero()) {
                continue;
            }
            let w_ii = w[ii];
            let x_slc: ArrayView1<F> = x.slice(s![.., ii]);
            if abs_diff_ne!(w_ii, F::zero()) {
                r.scaled_add(w_ii, &x_slc);
            }
            let tmp: F = x_slc.dot(&r);
            w[ii] = soft_threshold(tmp, n_samples * l1_ratio * penalty)
                / (norm_cols_x[ii] + n_samples * (F::one() - l1_ratio) * penalty);
            if abs_diff_ne!(w[ii], F::zero()) {
                r.scaled_add(-w[ii], &x_slc);
            }
            let d_w_ii = (w[ii] - w_ii).abs();
            d_w_max = F::max(d_w_max, d_w_ii);
            w_max = F::max(w_max, w[ii].abs());
        }
        n_steps += 1;

        if n_steps == max_steps || abs_diff_eq!(w_max, F::zero()) || d_w_max / w_max < d_w_tol {
            // We've hit one potential stopping criteria
            // check duality gap for ultimate stopping criterion
            gap = duality_gap(x.view(), y.view(), w.view(), r.view(), l1_ratio, penalty);
            if gap <= tol {
                break;
            }
        }
    }
    (w, gap, n_steps)
}

fn duality_gap<'a, F: Float>(
    x: ArrayView2<'a, F>,
    y: ArrayView1<'a, F>,
    w: ArrayView1<'a, F>,
    r: ArrayView1<'a, F>,
    l1_ratio: F,
    penalty: F,
) -> F {
    let half = F::cast(0.5);
    let n_samples = F::cast(x.nrows());
    let l1_reg = l1_ratio * penalty * n_samples;
    let l2_reg = (F::one() - l1_ratio) * penalty * n_samples;
    let xta = x.t().dot(&r) - &w * l2_reg;

    let dual_norm_xta = xta.fold(F::zero(), |abs_max, &x| abs_max.max(x.abs()));
    let r_norm2 = r.dot(&r);
    let w_norm2 = w.dot(&w);
    let (const_, mut gap) = if dual_norm_xta > l1_reg {
        let const_ = l1_reg / dual_norm_xta;
        let a_norm2 = r_norm2 * const_ * const_;
        (const_, half * (r_norm2 + a_norm2))
    } else {
        (F::one(), r_norm2)
    };
    let l1_norm = w.fold(F::zero(), |sum, w_i| sum + w_i.abs());
    gap += l1_reg * l1_norm - const_ * r.dot(&y)
        + half * l2_reg * (F::one() + const_ * const_) * w_norm2;
    gap
}
