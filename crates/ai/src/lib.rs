//! `restock-ai`
//!
//! **Responsibility:** the trainable reorder classifier and its training data.
//!
//! This crate is intentionally **not** part of the catalog domain:
//! - It must not depend on catalog types; inputs arrive as [`FeatureVector`]s.
//! - It must not hold ambient state. A trained model is an explicit value
//!   returned by `train` and threaded into scoring by the caller.
//! - It emits scores and decisions, not catalog mutations.

pub mod classifier;
pub mod corpus;
pub mod error;
pub mod features;
pub mod model;
pub mod strategy;

pub use classifier::{Classifier, TrainConfig};
pub use corpus::{generate, reorder_label, CorpusSpec, TrainingCorpus};
pub use error::{GenerationError, InferenceError, TrainingError};
pub use features::FeatureVector;
pub use model::{ReorderModel, HIDDEN_UNITS, INPUT_FEATURES};
pub use strategy::{
    DecisionStrategy, DeterministicRuleStrategy, LearnedClassifierStrategy, RuleOutcome,
    SCORE_THRESHOLD,
};
