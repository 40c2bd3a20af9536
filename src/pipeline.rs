//! Feature pipelines
//!
//! A [`Pipeline`] is an ordered, immutable list of stages. Fitting the pipeline fits every stage
//! on the frame produced by the stages before it and returns a [`FittedPipeline`], which then
//! transforms any frame with the same schema.

use std::collections::HashSet;

use crate::error::Error;
use crate::frame::Frame;
use crate::traits::Transformer;

/// A feature stage that learns its state from a frame
pub trait Stage {
    /// The stage after fitting, able to transform frames
    type Fitted: Transformer<Frame, Result<Frame, Self::Error>>;
    type Error: std::error::Error + From<Error>;

    /// Columns read by this stage
    fn input_cols(&self) -> Vec<&str>;

    /// Columns written by this stage
    fn output_cols(&self) -> Vec<&str>;

    /// Learn the stage state from `frame`
    fn fit_stage(&self, frame: &Frame) -> Result<Self::Fitted, Self::Error>;
}

/// Ordered list of feature stages
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline<S> {
    stages: Vec<S>,
}

impl<S: Stage> Pipeline<S> {
    pub fn new(stages: Vec<S>) -> Self {
        Pipeline { stages }
    }

    pub fn stages(&self) -> &[S] {
        &self.stages
    }

    /// Checks that every column a stage reads is either present in `source` or written by an
    /// earlier stage
    pub fn validate<I: AsRef<str>>(&self, source: &[I]) -> Result<(), Error> {
        let mut available: HashSet<&str> = source.iter().map(|s| s.as_ref()).collect();
        for stage in &self.stages {
            for col in stage.input_cols() {
                if !available.contains(col) {
                    return Err(Error::MissingColumn(col.to_string()));
                }
            }
            available.extend(stage.output_cols());
        }
        Ok(())
    }

    /// Fit all stages in order
    ///
    /// Each stage is fitted on the output of the previously fitted stages. The last stage is
    /// fitted but does not transform the frame.
    pub fn fit(&self, frame: &Frame) -> Result<FittedPipeline<S::Fitted>, S::Error> {
        self.validate(frame.names())?;

        let mut fitted = Vec::with_capacity(self.stages.len());
        let mut current = frame.clone();
        for (i, stage) in self.stages.iter().enumerate() {
            let stage = stage.fit_stage(&current)?;
            if i + 1 < self.stages.len() {
                current = stage.transform(current)?;
            }
            fitted.push(stage);
        }

        Ok(FittedPipeline { stages: fitted })
    }
}

/// A pipeline with every stage fitted
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct FittedPipeline<T> {
    stages: Vec<T>,
}

impl<T> FittedPipeline<T> {
    pub fn stages(&self) -> &[T] {
        &self.stages
    }
}

impl<T, E> Transformer<Frame, Result<Frame, E>> for FittedPipeline<T>
where
    T: Transformer<Frame, Result<Frame, E>>,
{
    /// Apply every fitted stage to `frame`, in order
    fn transform(&self, frame: Frame) -> Result<Frame, E> {
        self.stages
            .iter()
            .try_fold(frame, |frame, stage| stage.transform(frame))
    }
}

impl<'a, T, E> Transformer<&'a Frame, Result<Frame, E>> for FittedPipeline<T>
where
    T: Transformer<Frame, Result<Frame, E>>,
{
    fn transform(&self, frame: &'a Frame) -> Result<Frame, E> {
        self.transform(frame.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Column;
    use ndarray::Array1;

    /// Adds a constant learned as the column mean
    #[derive(Debug)]
    struct Center {
        input: String,
        output: String,
    }

    #[derive(Debug)]
    struct FittedCenter {
        input: String,
        output: String,
        mean: f64,
    }

    impl Stage for Center {
        type Fitted = FittedCenter;
        type Error = Error;

        fn input_cols(&self) -> Vec<&str> {
            vec![self.input.as_str()]
        }

        fn output_cols(&self) -> Vec<&str> {
            vec![self.output.as_str()]
        }

        fn fit_stage(&self, frame: &Frame) -> Result<FittedCenter, Error> {
            let mean = frame
                .numeric(&self.input)?
                .mean()
                .ok_or(Error::NotEnoughSamples)?;
            Ok(FittedCenter {
                input: self.input.clone(),
                output: self.output.clone(),
                mean,
            })
        }
    }

    impl Transformer<Frame, Result<Frame, Error>> for FittedCenter {
        fn transform(&self, frame: Frame) -> Result<Frame, Error> {
            let centered: Array1<f64> = frame.numeric(&self.input)?.mapv(|x| x - self.mean);
            frame.with_column(self.output.as_str(), Column::Numeric(centered))
        }
    }

    fn center(input: &str, output: &str) -> Center {
        Center {
            input: input.into(),
            output: output.into(),
        }
    }

    #[test]
    fn stages_are_fitted_on_previous_output() {
        let frame = Frame::new()
            .with_column("x", Column::Numeric(ndarray::array![1.0, 2.0, 6.0]))
            .unwrap();
        let pipeline = Pipeline::new(vec![center("x", "x_c"), center("x_c", "x_cc")]);

        let fitted = pipeline.fit(&frame).unwrap();
        assert_eq!(fitted.stages()[0].mean, 3.0);
        assert_eq!(fitted.stages()[1].mean, 0.0);

        let out: Result<Frame, Error> = fitted.transform(&frame);
        let out = out.unwrap();
        assert_eq!(out.numeric("x_cc").unwrap().to_vec(), vec![-2.0, -1.0, 3.0]);
    }

    #[test]
    fn unknown_inputs_are_rejected_before_fitting() {
        let pipeline = Pipeline::new(vec![center("x", "x_c"), center("y", "y_c")]);
        assert!(matches!(
            pipeline.validate(&["x"]),
            Err(Error::MissingColumn(col)) if col == "y"
        ));
    }
}
