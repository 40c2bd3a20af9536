//! # Feature stages
//!
//! `fare-preprocessing` turns the raw columns of a trip [`Frame`](fare::frame::Frame) into the
//! single dense `features` column consumed by the regression. It provides four stages, each of
//! them fitted on a training frame and then applied to any frame with the same schema:
//!
//! * [`StringIndexer`]: categorical labels to integer codes
//! * [`OneHotEncoder`]: integer codes to sparse indicator vectors
//! * [`VectorAssembler`]: several columns concatenated into one dense vector
//! * [`StandardScaler`]: mean removal and scaling to unit variance
//!
//! The [`FeatureStage`] enum lets stages of different kinds live in one
//! [`FeaturePipeline`].

pub mod error;
mod one_hot_encoding;
mod stage;
mod standard_scaling;
mod string_indexer;
mod vector_assembler;

pub use error::{PreprocessingError, Result};
pub use one_hot_encoding::{FittedOneHotEncoder, OneHotEncoder};
pub use stage::{FeaturePipeline, FeatureStage, FittedFeaturePipeline, FittedFeatureStage};
pub use standard_scaling::{FittedStandardScaler, StandardScaler};
pub use string_indexer::{FittedStringIndexer, HandleInvalid, StringIndexer, StringOrder};
pub use vector_assembler::{FittedVectorAssembler, VectorAssembler};
