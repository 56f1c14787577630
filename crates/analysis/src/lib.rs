//! `restock-analysis`
//!
//! **Responsibility:** orchestration of one analysis cycle and the worklist
//! it produces.
//!
//! This crate wires the pieces together: it trains a classifier on a fresh
//! synthetic corpus, scores the loaded catalog batch against the trained
//! model, and turns scores into an ordered, filterable worklist for the
//! presentation layer. The state machine (`Idle → Training → Scoring →
//! Complete`, `Failed` terminal) lives here, as does the background worker
//! that gives callers an asynchronous surface over it.

pub mod pipeline;
pub mod rank;
pub mod scored;
pub mod session;
pub mod worker;

pub use pipeline::{score_batch, CancelToken, ScoredBatch};
pub use rank::{apply_filter, FilterCriteria};
pub use scored::{days_of_supply, item_features, Prediction, ScoredItem};
pub use session::{
    AnalysisConfig, AnalysisError, AnalysisReport, AnalysisSession, AnalysisStatus, StatusHandle,
};
pub use worker::{
    AnalysisSink, AnalysisWorker, AnalysisWorkerHandle, InMemoryAnalysisSink, SubmitError,
};
