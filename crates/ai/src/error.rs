use thiserror::Error;

/// Corpus generation failure (malformed parameters).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid corpus parameter: {0}")]
    InvalidParameter(String),
}

/// Training failure.
///
/// Not retried automatically; the caller decides whether to restart the
/// analysis cycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrainingError {
    #[error("training corpus is empty")]
    EmptyCorpus,

    #[error("corpus feature/label counts differ: {features} features, {labels} labels")]
    CorpusMismatch { features: usize, labels: usize },

    /// The epoch loss went non-finite during fitting.
    #[error("loss diverged to a non-finite value in epoch {epoch}")]
    Diverged { epoch: usize },
}

/// Inference failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// Scoring was requested before any training pass completed.
    #[error("no trained model is available")]
    Untrained,

    #[error("non-finite feature input: {0}")]
    NonFiniteFeature(String),
}
