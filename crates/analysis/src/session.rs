//! The analysis session: one state machine per worklist.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use restock_ai::{
    generate, Classifier, CorpusSpec, GenerationError, InferenceError, ReorderModel, TrainConfig,
    TrainingError,
};
use restock_catalog::InventoryItem;
use restock_core::RunId;

use crate::pipeline::{score_batch, CancelToken};
use crate::rank::{apply_filter, FilterCriteria};
use crate::scored::ScoredItem;

/// Lifecycle of one analysis cycle.
///
/// `Idle → Training → Scoring → Complete`, with `Failed` reachable from the
/// two in-flight states. Re-running from `Complete` or `Failed` is a new
/// cycle back through `Training`. Loading a new batch resets to `Idle`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    Idle,
    Training,
    Scoring,
    Complete,
    Failed,
}

impl AnalysisStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, AnalysisStatus::Training | AnalysisStatus::Scoring)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, AnalysisStatus::Complete)
    }
}

/// Cheap cloneable read handle on a session's status.
///
/// The session updates it as the cycle progresses; UI threads read it
/// without touching the session itself.
#[derive(Debug, Clone)]
pub struct StatusHandle(Arc<Mutex<AnalysisStatus>>);

impl StatusHandle {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(AnalysisStatus::Idle)))
    }

    pub fn get(&self) -> AnalysisStatus {
        *self.0.lock().unwrap()
    }

    pub(crate) fn set(&self, status: AnalysisStatus) {
        *self.0.lock().unwrap() = status;
    }
}

/// Run-level error, wrapping whichever stage failed.
///
/// Never retried automatically; the caller decides whether to start a new
/// cycle.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("an analysis run is already in progress")]
    RunInProgress,

    #[error("corpus generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("training failed: {0}")]
    Training(#[from] TrainingError),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}

/// Session configuration: corpus and training parameters plus an optional
/// seed for reproducible runs.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    corpus: CorpusSpec,
    train: TrainConfig,
    seed: Option<u64>,
}

impl AnalysisConfig {
    pub fn with_corpus_spec(mut self, corpus: CorpusSpec) -> Self {
        self.corpus = corpus;
        self
    }

    pub fn with_train_config(mut self, train: TrainConfig) -> Self {
        self.train = train;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Report for one finished analysis pass.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub run: RunId,
    pub items: Vec<ScoredItem>,
    /// True when the scoring stage was cancelled before covering every item.
    pub cancelled: bool,
    pub reorder_count: usize,
    pub finished_at: DateTime<Utc>,
}

/// One analysis session.
///
/// Owns the working set of items, the status machine, and, between runs,
/// the trained model. The model is an explicit value: returned by training,
/// threaded into scoring, and replaced wholesale by the next successful run.
/// There is no process-wide model state.
pub struct AnalysisSession {
    config: AnalysisConfig,
    status: StatusHandle,
    model: Option<ReorderModel>,
    items: Vec<ScoredItem>,
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            status: StatusHandle::new(),
            model: None,
            items: Vec::new(),
        }
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status.get()
    }

    /// Share the status cell with another thread (e.g. a UI poller).
    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    pub fn scored_items(&self) -> &[ScoredItem] {
        &self.items
    }

    pub fn model(&self) -> Option<&ReorderModel> {
        self.model.as_ref()
    }

    pub fn reorder_count(&self) -> usize {
        self.items
            .iter()
            .filter(|s| s.prediction.needs_reorder())
            .count()
    }

    /// Replace the session configuration for subsequent runs.
    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.config = config;
    }

    /// Replace the working set, e.g. on a catalog page change.
    ///
    /// A new batch invalidates any previous pass: items start `Pending` and
    /// the status resets to `Idle`. This is the explicit form of the
    /// "page change resets analysis" behavior.
    pub fn load_batch(&mut self, items: Vec<InventoryItem>) {
        self.items = items.into_iter().map(ScoredItem::pending).collect();
        self.status.set(AnalysisStatus::Idle);
    }

    /// Run one full cycle: generate a corpus, train, score the working set.
    ///
    /// Rejected with [`AnalysisError::RunInProgress`] while a cycle is in
    /// flight; runs are never interleaved. On failure the status moves to
    /// `Failed` and previously scored items are preserved as the
    /// last-known-good worklist.
    pub fn run_analysis(&mut self, cancel: &CancelToken) -> Result<AnalysisReport, AnalysisError> {
        if self.status().is_in_flight() {
            return Err(AnalysisError::RunInProgress);
        }

        let run = RunId::new();
        info!(%run, items = self.items.len(), "analysis cycle started");

        self.status.set(AnalysisStatus::Training);
        let model = match self.train_model() {
            Ok(model) => model,
            Err(e) => {
                warn!(%run, error = %e, "training stage failed");
                self.status.set(AnalysisStatus::Failed);
                return Err(e);
            }
        };

        // Each successful training pass replaces the model wholesale.
        self.model = Some(model.clone());

        Ok(self.score_current(run, &model, cancel))
    }

    /// Score the current working set against the held model, without
    /// retraining.
    ///
    /// Fails with [`InferenceError::Untrained`] before any successful
    /// training pass; nothing is mutated in that case and no partial scored
    /// item is produced.
    pub fn rescore(&mut self, cancel: &CancelToken) -> Result<AnalysisReport, AnalysisError> {
        if self.status().is_in_flight() {
            return Err(AnalysisError::RunInProgress);
        }

        let model = self
            .model
            .clone()
            .ok_or(AnalysisError::Inference(InferenceError::Untrained))?;

        let run = RunId::new();
        info!(%run, items = self.items.len(), "rescoring against held model");
        Ok(self.score_current(run, &model, cancel))
    }

    /// Filter and rank the current worklist; ordering only applies once the
    /// cycle is `Complete`.
    pub fn apply_filter(&self, criteria: &FilterCriteria) -> Vec<ScoredItem> {
        apply_filter(&self.items, criteria, self.status().is_complete())
    }

    fn train_model(&self) -> Result<ReorderModel, AnalysisError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // The corpus lives only for this pass; dropped on every exit path.
        let corpus = generate(&self.config.corpus, &mut rng)?;
        let model = Classifier::train(&corpus, &self.config.train, &mut rng)?;
        Ok(model)
    }

    fn score_current(
        &mut self,
        run: RunId,
        model: &ReorderModel,
        cancel: &CancelToken,
    ) -> AnalysisReport {
        self.status.set(AnalysisStatus::Scoring);

        let batch_items: Vec<InventoryItem> =
            self.items.iter().map(|s| s.item.clone()).collect();
        let batch = score_batch(model, &batch_items, cancel);

        self.items = batch.items;
        if batch.cancelled {
            // The pass did not complete, so ranking and the reorder filter
            // stay disabled; partial per-item scores remain visible.
            self.status.set(AnalysisStatus::Idle);
        } else {
            self.status.set(AnalysisStatus::Complete);
        }

        let reorder_count = self.reorder_count();
        info!(%run, cancelled = batch.cancelled, reorder_count, "analysis cycle finished");

        AnalysisReport {
            run,
            items: self.items.clone(),
            cancelled: batch.cancelled,
            reorder_count,
            finished_at: Utc::now(),
        }
    }
}
