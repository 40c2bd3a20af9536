//! A single stage type covering every feature stage, so that heterogeneous stages can share one
//! pipeline and be persisted together.

use fare::frame::Frame;
use fare::pipeline::{FittedPipeline, Pipeline, Stage};
use fare::traits::Transformer;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{PreprocessingError, Result};
use crate::{
    FittedOneHotEncoder, FittedStandardScaler, FittedStringIndexer, FittedVectorAssembler,
    OneHotEncoder, StandardScaler, StringIndexer, VectorAssembler,
};

/// Pipeline made of [`FeatureStage`]s
pub type FeaturePipeline = Pipeline<FeatureStage>;

/// Fitted counterpart of [`FeaturePipeline`]
pub type FittedFeaturePipeline = FittedPipeline<FittedFeatureStage>;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", tag = "stage")
)]
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureStage {
    StringIndexer(StringIndexer),
    OneHotEncoder(OneHotEncoder),
    VectorAssembler(VectorAssembler),
    StandardScaler(StandardScaler),
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", tag = "stage")
)]
#[derive(Clone, Debug, PartialEq)]
pub enum FittedFeatureStage {
    StringIndexer(FittedStringIndexer),
    OneHotEncoder(FittedOneHotEncoder),
    VectorAssembler(FittedVectorAssembler),
    StandardScaler(FittedStandardScaler),
}

impl FeatureStage {
    /// Name of the stage kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            FeatureStage::StringIndexer(_) => "StringIndexer",
            FeatureStage::OneHotEncoder(_) => "OneHotEncoder",
            FeatureStage::VectorAssembler(_) => "VectorAssembler",
            FeatureStage::StandardScaler(_) => "StandardScaler",
        }
    }
}

impl Stage for FeatureStage {
    type Fitted = FittedFeatureStage;
    type Error = PreprocessingError;

    fn input_cols(&self) -> Vec<&str> {
        match self {
            FeatureStage::StringIndexer(s) => s.input_cols(),
            FeatureStage::OneHotEncoder(s) => s.input_cols(),
            FeatureStage::VectorAssembler(s) => s.input_cols(),
            FeatureStage::StandardScaler(s) => s.input_cols(),
        }
    }

    fn output_cols(&self) -> Vec<&str> {
        match self {
            FeatureStage::StringIndexer(s) => s.output_cols(),
            FeatureStage::OneHotEncoder(s) => s.output_cols(),
            FeatureStage::VectorAssembler(s) => s.output_cols(),
            FeatureStage::StandardScaler(s) => s.output_cols(),
        }
    }

    fn fit_stage(&self, frame: &Frame) -> Result<FittedFeatureStage> {
        Ok(match self {
            FeatureStage::StringIndexer(s) => FittedFeatureStage::StringIndexer(s.fit(frame)?),
            FeatureStage::OneHotEncoder(s) => FittedFeatureStage::OneHotEncoder(s.fit(frame)?),
            FeatureStage::VectorAssembler(s) => {
                FittedFeatureStage::VectorAssembler(s.fit(frame)?)
            }
            FeatureStage::StandardScaler(s) => FittedFeatureStage::StandardScaler(s.fit(frame)?),
        })
    }
}

impl Transformer<Frame, Result<Frame>> for FittedFeatureStage {
    fn transform(&self, frame: Frame) -> Result<Frame> {
        match self {
            FittedFeatureStage::StringIndexer(s) => s.transform(frame),
            FittedFeatureStage::OneHotEncoder(s) => s.transform(frame),
            FittedFeatureStage::VectorAssembler(s) => s.transform(frame),
            FittedFeatureStage::StandardScaler(s) => s.transform(frame),
        }
    }
}

macro_rules! impl_from_stage {
    ($($stage:ident => $fitted:ident),*) => {
        $(
            impl From<$stage> for FeatureStage {
                fn from(stage: $stage) -> Self {
                    FeatureStage::$stage(stage)
                }
            }

            impl From<$fitted> for FittedFeatureStage {
                fn from(stage: $fitted) -> Self {
                    FittedFeatureStage::$stage(stage)
                }
            }
        )*
    };
}

impl_from_stage!(
    StringIndexer => FittedStringIndexer,
    OneHotEncoder => FittedOneHotEncoder,
    VectorAssembler => FittedVectorAssembler,
    StandardScaler => FittedStandardScaler
);
