//! Concatenate columns into a single dense vector column

use fare::frame::{Column, Frame};
use fare::pipeline::Stage;
use fare::traits::Transformer;
use ndarray::{s, Array2};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{PreprocessingError, Result};

/// Vector assembler: concatenates numeric, index and vector columns, in the given order, into
/// one dense vector per row.
///
/// Missing numeric values are rejected.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct VectorAssembler {
    input_cols: Vec<String>,
    output_col: String,
}

impl VectorAssembler {
    pub fn new<I: Into<String>>(input_cols: Vec<I>, output_col: impl Into<String>) -> Self {
        VectorAssembler {
            input_cols: input_cols.into_iter().map(Into::into).collect(),
            output_col: output_col.into(),
        }
    }

    pub fn input_col_names(&self) -> &[String] {
        &self.input_cols
    }

    /// Records the width of every input column, later frames have to match them
    pub fn fit(&self, frame: &Frame) -> Result<FittedVectorAssembler> {
        if self.input_cols.is_empty() {
            return Err(PreprocessingError::NoInputColumns(self.output_col.clone()));
        }

        let widths = self
            .input_cols
            .iter()
            .map(|name| -> Result<usize> {
                let column = frame.column(name)?;
                if let Column::Text(_) = column {
                    return Err(fare::Error::ColumnKind {
                        name: name.clone(),
                        expected: "numeric or vector",
                        found: column.kind(),
                    }
                    .into());
                }
                Ok(column.width())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FittedVectorAssembler {
            input_cols: self.input_cols.clone(),
            output_col: self.output_col.clone(),
            widths,
        })
    }
}

/// The result of fitting a [`VectorAssembler`]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct FittedVectorAssembler {
    input_cols: Vec<String>,
    output_col: String,
    widths: Vec<usize>,
}

impl FittedVectorAssembler {
    /// Width of the assembled vector
    pub fn size(&self) -> usize {
        self.widths.iter().sum()
    }

    /// Input columns together with the number of values they contribute
    pub fn layout(&self) -> impl Iterator<Item = (&str, usize)> {
        self.input_cols
            .iter()
            .map(String::as_str)
            .zip(self.widths.iter().copied())
    }

    /// One name per component of the assembled vector
    ///
    /// Scalar inputs keep their column name, vector inputs are suffixed by the component
    /// position.
    pub fn feature_names(&self) -> Vec<String> {
        self.layout()
            .flat_map(|(name, width)| {
                (0..width).map(move |i| {
                    if width == 1 {
                        name.to_string()
                    } else {
                        format!("{}_{}", name, i)
                    }
                })
            })
            .collect()
    }
}

impl Transformer<Frame, Result<Frame>> for FittedVectorAssembler {
    fn transform(&self, frame: Frame) -> Result<Frame> {
        let mut assembled = Array2::<f64>::zeros((frame.nrows(), self.size()));

        let mut offset = 0;
        for (name, width) in self.layout() {
            let column = frame.column(name)?;
            if column.width() != width {
                return Err(PreprocessingError::WidthMismatch {
                    column: name.to_string(),
                    expected: width,
                    found: column.width(),
                });
            }

            match column {
                Column::Numeric(_) => {
                    let values = frame.complete_numeric(name)?;
                    assembled.column_mut(offset).assign(&values);
                }
                Column::Index { codes, .. } => {
                    for (row, &code) in codes.iter().enumerate() {
                        assembled[(row, offset)] = code as f64;
                    }
                }
                Column::Dense(values) => {
                    assembled
                        .slice_mut(s![.., offset..offset + width])
                        .assign(values);
                }
                Column::Sparse(values) => {
                    for (row, vec) in values.outer_iterator().enumerate() {
                        for (col, &val) in vec.iter() {
                            assembled[(row, offset + col)] = val;
                        }
                    }
                }
                Column::Text(_) => {
                    return Err(fare::Error::ColumnKind {
                        name: name.to_string(),
                        expected: "numeric or vector",
                        found: column.kind(),
                    }
                    .into())
                }
            }
            offset += width;
        }

        Ok(frame.with_column(self.output_col.as_str(), Column::Dense(assembled))?)
    }
}

impl Stage for VectorAssembler {
    type Fitted = FittedVectorAssembler;
    type Error = PreprocessingError;

    fn input_cols(&self) -> Vec<&str> {
        self.input_cols.iter().map(String::as_str).collect()
    }

    fn output_cols(&self) -> Vec<&str> {
        vec![self.output_col.as_str()]
    }

    fn fit_stage(&self, frame: &Frame) -> Result<FittedVectorAssembler> {
        self.fit(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use sprs::CsMat;

    fn frame() -> Frame {
        Frame::new()
            .with_column("distance", Column::Numeric(array![1.5, 3.0]))
            .unwrap()
            .with_column(
                "day_onehot",
                Column::Sparse(CsMat::new((2, 3), vec![0, 1, 1], vec![2], vec![1.0])),
            )
            .unwrap()
            .with_column("scaled", Column::Dense(array![[0.5], [-0.5]]))
            .unwrap()
    }

    #[test]
    fn columns_are_concatenated_in_order() {
        let assembler = VectorAssembler::new(vec!["day_onehot", "distance", "scaled"], "features");
        assert_eq!(assembler.input_col_names(), &["day_onehot", "distance", "scaled"]);
        let fitted = assembler.fit(&frame()).unwrap();
        assert_eq!(fitted.size(), 5);
        assert_eq!(
            fitted.feature_names(),
            vec![
                "day_onehot_0",
                "day_onehot_1",
                "day_onehot_2",
                "distance",
                "scaled"
            ]
        );

        let out = fitted.transform(frame()).unwrap();
        assert_eq!(
            out.dense("features").unwrap(),
            array![[0.0, 0.0, 1.0, 1.5, 0.5], [0.0, 0.0, 0.0, 3.0, -0.5]]
        );
    }

    #[test]
    fn missing_values_are_rejected() {
        let fitted = VectorAssembler::new(vec!["distance"], "features")
            .fit(&frame())
            .unwrap();
        let frame = frame()
            .with_column("distance", Column::Numeric(array![1.0, f64::NAN]))
            .unwrap();

        assert!(matches!(
            fitted.transform(frame),
            Err(PreprocessingError::BaseCrate(fare::Error::NullValue { row: 1, .. }))
        ));
    }

    #[test]
    fn width_changes_after_fitting_are_rejected() {
        let fitted = VectorAssembler::new(vec!["day_onehot"], "features")
            .fit(&frame())
            .unwrap();
        let frame = frame()
            .with_column(
                "day_onehot",
                Column::Sparse(CsMat::new((2, 2), vec![0, 1, 2], vec![0, 1], vec![1.0, 1.0])),
            )
            .unwrap();

        assert!(matches!(
            fitted.transform(frame),
            Err(PreprocessingError::WidthMismatch {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn text_and_empty_inputs_are_rejected() {
        let frame = frame()
            .with_column("day", Column::Text(vec![None, None]))
            .unwrap();
        assert!(VectorAssembler::new(vec!["day"], "features")
            .fit(&frame)
            .is_err());
        assert!(matches!(
            VectorAssembler::new(Vec::<String>::new(), "features").fit(&frame),
            Err(PreprocessingError::NoInputColumns(_))
        ));
    }
}
