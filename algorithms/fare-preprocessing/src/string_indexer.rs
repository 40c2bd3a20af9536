//! Map categorical strings to integer codes

use std::collections::HashMap;

use fare::frame::{Column, Frame};
use fare::pipeline::Stage;
use fare::traits::Transformer;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{PreprocessingError, Result};

/// What to do with labels that were not seen during fitting, or missing labels
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HandleInvalid {
    /// Fail the transformation
    #[default]
    Error,
    /// Drop the rows from the frame
    Skip,
    /// Map them to an extra code equal to the number of labels
    Keep,
}

/// Order in which labels receive their codes
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StringOrder {
    /// Most frequent label first, ties broken alphabetically
    #[default]
    FrequencyDesc,
    /// Least frequent label first, ties broken alphabetically
    FrequencyAsc,
    AlphabetDesc,
    AlphabetAsc,
}

/// String indexer: learns the set of labels of a text column and replaces every label by its
/// position in that set.
///
/// The output column is an index column which remembers how many categories it can hold, so
/// that a following [`OneHotEncoder`](crate::OneHotEncoder) knows the width of its vectors.
///
/// ### Example
///
/// ```rust
/// use fare::frame::{Column, Frame};
/// use fare::traits::Transformer;
/// use fare_preprocessing::{HandleInvalid, StringIndexer};
///
/// let frame = Frame::new()
///     .with_column("day", Column::Text(vec![Some("Mon".into()), Some("Tue".into()), Some("Mon".into())]))
///     .unwrap();
///
/// let indexer = StringIndexer::new("day", "day_idx")
///     .handle_invalid(HandleInvalid::Keep)
///     .fit(&frame)
///     .unwrap();
/// let frame = indexer.transform(frame).unwrap();
/// assert_eq!(frame.index("day_idx").unwrap(), (&[0, 1, 0][..], 3));
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct StringIndexer {
    input_col: String,
    output_col: String,
    handle_invalid: HandleInvalid,
    order: StringOrder,
}

impl StringIndexer {
    pub fn new(input_col: impl Into<String>, output_col: impl Into<String>) -> Self {
        StringIndexer {
            input_col: input_col.into(),
            output_col: output_col.into(),
            handle_invalid: HandleInvalid::default(),
            order: StringOrder::default(),
        }
    }

    /// Policy for unseen or missing labels at transform time.
    ///
    /// Defaults to [`HandleInvalid::Error`]
    pub fn handle_invalid(mut self, handle_invalid: HandleInvalid) -> Self {
        self.handle_invalid = handle_invalid;
        self
    }

    /// Defaults to [`StringOrder::FrequencyDesc`]
    pub fn string_order(mut self, order: StringOrder) -> Self {
        self.order = order;
        self
    }

    pub fn input_col(&self) -> &str {
        &self.input_col
    }

    pub fn output_col(&self) -> &str {
        &self.output_col
    }

    /// Learn the labels of the input column. Missing values are not counted as labels.
    pub fn fit(&self, frame: &Frame) -> Result<FittedStringIndexer> {
        let values = frame.text(&self.input_col)?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values.iter().flatten() {
            *counts.entry(value.as_str()).or_insert(0) += 1;
        }
        if counts.is_empty() {
            return Err(PreprocessingError::NoLabels(self.input_col.clone()));
        }

        let mut labels: Vec<(&str, usize)> = counts.into_iter().collect();
        match self.order {
            StringOrder::FrequencyDesc => {
                labels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
            }
            StringOrder::FrequencyAsc => {
                labels.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
            }
            StringOrder::AlphabetDesc => labels.sort_by(|a, b| b.0.cmp(a.0)),
            StringOrder::AlphabetAsc => labels.sort_by(|a, b| a.0.cmp(b.0)),
        }

        let labels: Vec<String> = labels.into_iter().map(|(l, _)| l.to_string()).collect();
        let lookup = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();

        Ok(FittedStringIndexer {
            input_col: self.input_col.clone(),
            output_col: self.output_col.clone(),
            handle_invalid: self.handle_invalid,
            labels,
            lookup,
        })
    }
}

/// The result of fitting a [`StringIndexer`]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct FittedStringIndexer {
    input_col: String,
    output_col: String,
    handle_invalid: HandleInvalid,
    labels: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl FittedStringIndexer {
    /// Labels ordered by their code
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of codes the output column can hold, including the bucket for invalid labels
    pub fn n_categories(&self) -> usize {
        match self.handle_invalid {
            HandleInvalid::Keep => self.labels.len() + 1,
            HandleInvalid::Error | HandleInvalid::Skip => self.labels.len(),
        }
    }

    pub fn input_col(&self) -> &str {
        &self.input_col
    }

    pub fn output_col(&self) -> &str {
        &self.output_col
    }
}

impl Transformer<Frame, Result<Frame>> for FittedStringIndexer {
    /// Replace labels by codes and append the index column
    fn transform(&self, frame: Frame) -> Result<Frame> {
        let values = frame.text(&self.input_col)?;
        let unknown = self.labels.len();

        let mut codes = Vec::with_capacity(values.len());
        let mut keep_rows = Vec::with_capacity(values.len());
        for (row, value) in values.iter().enumerate() {
            let code = value.as_ref().and_then(|v| self.lookup.get(v).copied());
            match (code, self.handle_invalid) {
                (Some(code), _) => {
                    codes.push(code);
                    keep_rows.push(row);
                }
                (None, HandleInvalid::Keep) => {
                    codes.push(unknown);
                    keep_rows.push(row);
                }
                (None, HandleInvalid::Skip) => {}
                (None, HandleInvalid::Error) => {
                    return Err(match value {
                        Some(label) => PreprocessingError::UnseenLabel {
                            column: self.input_col.clone(),
                            label: label.clone(),
                        },
                        None => PreprocessingError::MissingLabel {
                            column: self.input_col.clone(),
                            row,
                        },
                    })
                }
            }
        }

        let frame = if keep_rows.len() < values.len() {
            frame.take(&keep_rows)
        } else {
            frame
        };

        let column = Column::Index {
            codes,
            n_categories: self.n_categories(),
        };
        Ok(frame.with_column(self.output_col.as_str(), column)?)
    }
}

impl Stage for StringIndexer {
    type Fitted = FittedStringIndexer;
    type Error = PreprocessingError;

    fn input_cols(&self) -> Vec<&str> {
        vec![self.input_col.as_str()]
    }

    fn output_cols(&self) -> Vec<&str> {
        vec![self.output_col.as_str()]
    }

    fn fit_stage(&self, frame: &Frame) -> Result<FittedStringIndexer> {
        self.fit(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(values: &[Option<&str>]) -> Frame {
        Frame::new()
            .with_column(
                "day",
                Column::Text(values.iter().map(|v| v.map(String::from)).collect()),
            )
            .unwrap()
    }

    #[test]
    fn labels_are_ordered_by_frequency_then_alphabet() {
        let frame = days(&[
            Some("Tue"),
            Some("Mon"),
            Some("Wed"),
            Some("Mon"),
            Some("Tue"),
            None,
            Some("Fri"),
        ]);
        let fitted = StringIndexer::new("day", "day_idx").fit(&frame).unwrap();
        assert_eq!(fitted.labels(), &["Mon", "Tue", "Fri", "Wed"]);

        let fitted = StringIndexer::new("day", "day_idx")
            .string_order(StringOrder::FrequencyAsc)
            .fit(&frame)
            .unwrap();
        assert_eq!(fitted.labels(), &["Fri", "Wed", "Mon", "Tue"]);

        let fitted = StringIndexer::new("day", "day_idx")
            .string_order(StringOrder::AlphabetDesc)
            .fit(&frame)
            .unwrap();
        assert_eq!(fitted.labels(), &["Wed", "Tue", "Mon", "Fri"]);
    }

    #[test]
    fn keep_maps_unseen_and_missing_to_extra_code() {
        let train = days(&[Some("Mon"), Some("Tue"), Some("Mon")]);
        let fitted = StringIndexer::new("day", "day_idx")
            .handle_invalid(HandleInvalid::Keep)
            .fit(&train)
            .unwrap();
        assert_eq!(fitted.n_categories(), 3);

        let test = days(&[Some("Sun"), Some("Tue"), None, Some("Mon")]);
        let out = fitted.transform(test).unwrap();
        let (codes, n_categories) = out.index("day_idx").unwrap();
        assert_eq!(codes, &[2, 1, 2, 0]);
        assert_eq!(n_categories, 3);
        assert_eq!(out.nrows(), 4);
    }

    #[test]
    fn skip_drops_rows_from_every_column() {
        let train = days(&[Some("Mon"), Some("Tue")]);
        let fitted = StringIndexer::new("day", "day_idx")
            .handle_invalid(HandleInvalid::Skip)
            .fit(&train)
            .unwrap();

        let test = days(&[Some("Sun"), Some("Tue"), None])
            .with_column("fare", Column::Numeric(ndarray::array![1.0, 2.0, 3.0]))
            .unwrap();
        let out = fitted.transform(test).unwrap();
        assert_eq!(out.nrows(), 1);
        assert_eq!(out.numeric("fare").unwrap().to_vec(), vec![2.0]);
        assert_eq!(out.index("day_idx").unwrap(), (&[1][..], 2));
    }

    #[test]
    fn error_policy_rejects_unseen_labels() {
        let fitted = StringIndexer::new("day", "day_idx")
            .fit(&days(&[Some("Mon")]))
            .unwrap();

        assert!(matches!(
            fitted.transform(days(&[Some("Sun")])),
            Err(PreprocessingError::UnseenLabel { label, .. }) if label == "Sun"
        ));
        assert!(matches!(
            fitted.transform(days(&[None])),
            Err(PreprocessingError::MissingLabel { row: 0, .. })
        ));
    }

    #[test]
    fn column_without_labels_cannot_be_fitted() {
        assert!(matches!(
            StringIndexer::new("day", "day_idx").fit(&days(&[None, None])),
            Err(PreprocessingError::NoLabels(_))
        ));
    }
}
