//! Standard scaling of vector columns

use approx::abs_diff_eq;
use fare::frame::{Column, Frame};
use fare::pipeline::Stage;
use fare::traits::Transformer;
use ndarray::{Array1, Array2, Axis, Zip};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{PreprocessingError, Result};

/// Standard scaler: learns the mean and the sample standard deviation of every component of a
/// vector column, producing a [fitted scaler](FittedStandardScaler) that scales other frames with
/// the same statistics.
///
/// * `with_mean`: subtract the mean of each component
/// * `with_std`: divide each component by its standard deviation
///
/// ### Example
///
/// ```rust
/// use fare::frame::{Column, Frame};
/// use fare::traits::Transformer;
/// use fare_preprocessing::StandardScaler;
/// use ndarray::array;
///
/// let frame = Frame::new()
///     .with_column("distance", Column::Dense(array![[1.0], [2.0], [3.0]]))
///     .unwrap();
///
/// let scaler = StandardScaler::new("distance", "distance_scaled").fit(&frame).unwrap();
/// let frame = scaler.transform(frame).unwrap();
/// assert_eq!(frame.dense("distance_scaled").unwrap(), array![[-1.0], [0.0], [1.0]]);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct StandardScaler {
    input_col: String,
    output_col: String,
    with_mean: bool,
    with_std: bool,
}

impl StandardScaler {
    /// Initializes a scaler that subtracts the mean and divides by the standard deviation
    pub fn new(input_col: impl Into<String>, output_col: impl Into<String>) -> Self {
        StandardScaler {
            input_col: input_col.into(),
            output_col: output_col.into(),
            with_mean: true,
            with_std: true,
        }
    }

    /// Defaults to `true`
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.with_mean = with_mean;
        self
    }

    /// Defaults to `true`
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.with_std = with_std;
        self
    }

    /// Learn the scaling statistics. Returns an error if the column contains no samples.
    pub fn fit(&self, frame: &Frame) -> Result<FittedStandardScaler> {
        let records = vectors(frame, &self.input_col)?;
        let nsamples = records.nrows();
        if nsamples == 0 {
            return Err(PreprocessingError::NotEnoughSamples);
        }

        let means = records
            .mean_axis(Axis(0))
            .ok_or(PreprocessingError::NotEnoughSamples)?;
        let offsets = if self.with_mean {
            means
        } else {
            Array1::zeros(records.ncols())
        };

        let ddof = if nsamples > 1 { 1.0 } else { 0.0 };
        let std_devs = records.std_axis(Axis(0), ddof);
        let scales = if self.with_std {
            std_devs.mapv(|s| {
                if abs_diff_eq!(s, 0.0) {
                    // if feature is constant then don't scale
                    1.0
                } else {
                    1.0 / s
                }
            })
        } else {
            Array1::ones(records.ncols())
        };

        Ok(FittedStandardScaler {
            input_col: self.input_col.clone(),
            output_col: self.output_col.clone(),
            offsets,
            scales,
            std_devs,
        })
    }
}

/// The result of fitting a [standard scaler](StandardScaler).
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct FittedStandardScaler {
    input_col: String,
    output_col: String,
    offsets: Array1<f64>,
    scales: Array1<f64>,
    std_devs: Array1<f64>,
}

impl FittedStandardScaler {
    /// Array of size `n_components` that contains the offset subtracted from each component
    pub fn offsets(&self) -> &Array1<f64> {
        &self.offsets
    }

    /// Array of size `n_components` that contains the factor applied to each component
    pub fn scales(&self) -> &Array1<f64> {
        &self.scales
    }

    /// Sample standard deviations measured during fitting
    pub fn std_devs(&self) -> &Array1<f64> {
        &self.std_devs
    }
}

impl Transformer<Frame, Result<Frame>> for FittedStandardScaler {
    /// Scales the input column according to the scaler's `offsets` and `scales`.
    fn transform(&self, frame: Frame) -> Result<Frame> {
        let mut x = vectors(&frame, &self.input_col)?;
        if x.ncols() != self.offsets.len() {
            return Err(PreprocessingError::WidthMismatch {
                column: self.input_col.clone(),
                expected: self.offsets.len(),
                found: x.ncols(),
            });
        }

        Zip::from(x.columns_mut())
            .and(&self.offsets)
            .and(&self.scales)
            .for_each(|mut col, &offset, &scale| {
                col.mapv_inplace(|el| (el - offset) * scale);
            });

        Ok(frame.with_column(self.output_col.as_str(), Column::Dense(x))?)
    }
}

impl Stage for StandardScaler {
    type Fitted = FittedStandardScaler;
    type Error = PreprocessingError;

    fn input_cols(&self) -> Vec<&str> {
        vec![self.input_col.as_str()]
    }

    fn output_cols(&self) -> Vec<&str> {
        vec![self.output_col.as_str()]
    }

    fn fit_stage(&self, frame: &Frame) -> Result<FittedStandardScaler> {
        self.fit(frame)
    }
}

/// Reads a dense vector column, or a complete numeric column as vectors of size one
fn vectors(frame: &Frame, name: &str) -> Result<Array2<f64>> {
    match frame.column(name)? {
        Column::Numeric(_) => Ok(frame
            .complete_numeric(name)?
            .to_owned()
            .insert_axis(Axis(1))),
        Column::Dense(values) => Ok(values.clone()),
        other => Err(fare::Error::ColumnKind {
            name: name.to_string(),
            expected: "dense vector",
            found: other.kind(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn frame(records: Array2<f64>) -> Frame {
        Frame::new()
            .with_column("x", Column::Dense(records))
            .unwrap()
    }

    #[test]
    fn test_standard_scaler() {
        let records = array![[1., -1., 2.], [2., 0., 0.], [0., 1., -1.]];
        let scaler = StandardScaler::new("x", "x_scaled")
            .fit(&frame(records.clone()))
            .unwrap();
        assert_abs_diff_eq!(*scaler.offsets(), array![1., 0., 1. / 3.], epsilon = 1e-12);
        assert_abs_diff_eq!(
            *scaler.scales(),
            array![1., 1., 1. / 1.5275],
            epsilon = 1e-4
        );
        assert_abs_diff_eq!(*scaler.std_devs(), array![1., 1., 1.5275], epsilon = 1e-4);

        let transformed = scaler.transform(frame(records)).unwrap();
        let scaled = transformed.dense("x_scaled").unwrap();
        let means = scaled.mean_axis(Axis(0)).unwrap();
        let std_devs = scaled.std_axis(Axis(0), 1.);
        assert_abs_diff_eq!(means, array![0., 0., 0.], epsilon = 1e-12);
        assert_abs_diff_eq!(std_devs, array![1., 1., 1.], epsilon = 1e-12);
    }

    #[test]
    fn test_standard_scaler_no_mean() {
        let records = array![[1., -1., 2.], [2., 0., 0.], [0., 1., -1.]];
        let scaler = StandardScaler::new("x", "x_scaled")
            .with_mean(false)
            .fit(&frame(records.clone()))
            .unwrap();
        assert_abs_diff_eq!(*scaler.offsets(), array![0., 0., 0.]);

        let transformed = scaler.transform(frame(records)).unwrap();
        let scaled = transformed.dense("x_scaled").unwrap();
        assert_abs_diff_eq!(scaled.column(0), array![1., 2., 0.], epsilon = 1e-12);
        assert_abs_diff_eq!(
            scaled.std_axis(Axis(0), 1.),
            array![1., 1., 1.],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_standard_scaler_no_std() {
        let records = array![[1., -1., 2.], [2., 0., 0.], [0., 1., -1.]];
        let scaler = StandardScaler::new("x", "x_scaled")
            .with_std(false)
            .fit(&frame(records.clone()))
            .unwrap();
        assert_abs_diff_eq!(*scaler.scales(), array![1., 1., 1.]);

        let transformed = scaler.transform(frame(records)).unwrap();
        let scaled = transformed.dense("x_scaled").unwrap();
        assert_abs_diff_eq!(
            scaled.mean_axis(Axis(0)).unwrap(),
            array![0., 0., 0.],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_standard_const_feature() {
        let records = array![[1., 2.], [2., 2.], [0., 2.]];
        let scaler = StandardScaler::new("x", "x_scaled")
            .fit(&frame(records.clone()))
            .unwrap();
        assert_abs_diff_eq!(*scaler.scales(), array![1., 1.]);

        let transformed = scaler.transform(frame(records)).unwrap();
        let scaled = transformed.dense("x_scaled").unwrap();
        // constant feature becomes zero
        assert_abs_diff_eq!(scaled.column(1), array![0., 0., 0.]);
    }

    #[test]
    fn statistics_come_from_fitting_frame_only() {
        let scaler = StandardScaler::new("x", "x_scaled")
            .fit(&frame(array![[1.], [3.]]))
            .unwrap();

        let transformed = scaler.transform(frame(array![[5.], [2.]])).unwrap();
        let expected = array![[3. / 2f64.sqrt()], [0.]];
        assert_abs_diff_eq!(
            transformed.dense("x_scaled").unwrap(),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn numeric_columns_are_accepted() {
        let frame = Frame::new()
            .with_column("n", Column::Numeric(array![2., 4.]))
            .unwrap();
        let scaler = StandardScaler::new("n", "n_scaled").fit(&frame).unwrap();
        assert_eq!(scaler.offsets().len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let empty = Array2::<f64>::zeros((0, 2));
        let scaler = StandardScaler::new("x", "x_scaled").fit(&frame(empty));
        assert_eq!(
            scaler.err().unwrap().to_string(),
            "not enough samples".to_string()
        );
    }

    #[test]
    fn test_transform_wrong_size_array() {
        let scaler = StandardScaler::new("x", "x_scaled")
            .fit(&frame(array![[1., -1.], [2., 0.]]))
            .unwrap();
        assert!(matches!(
            scaler.transform(frame(array![[1.]])),
            Err(PreprocessingError::WidthMismatch {
                expected: 2,
                found: 1,
                ..
            })
        ));
    }
}
