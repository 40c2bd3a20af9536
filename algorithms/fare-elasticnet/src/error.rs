use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElasticNetError>;

#[derive(Debug, Clone, Error)]
pub enum ElasticNetError {
    /// The input has not enough samples
    #[error("not enough samples to fit the model")]
    NotEnoughSamples,
    /// Records handed to a fitted model have a different width than the training records
    #[error("model was fitted on {expected} features, got {found}")]
    FeatureMismatch { expected: usize, found: usize },
    #[error("penalty should be positive, but is {0}")]
    InvalidPenalty(f32),
    #[error("l1 ratio should be in range [0, 1], but is {0}")]
    InvalidL1Ratio(f32),
    #[error("tolerance should be positive, but is {0}")]
    InvalidTolerance(f32),
    #[error("at least one iteration is required")]
    InvalidMaxIterations,
    #[error(transparent)]
    BaseCrate(#[from] fare::Error),
}
