//! Background analysis worker.
//!
//! Gives the presentation layer an asynchronous surface over the session:
//! submit a batch, poll the status handle, receive the outcome through a
//! sink. One dedicated thread owns the session; submissions go through a
//! bounded queue and are never interleaved.

use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use restock_catalog::InventoryItem;

use crate::pipeline::CancelToken;
use crate::session::{AnalysisError, AnalysisReport, AnalysisSession, AnalysisStatus, StatusHandle};

/// Sink for analysis outcomes.
///
/// Outcomes are insights for the caller, delivered off the worker thread;
/// they never feed back into the worker.
pub trait AnalysisSink: Send + Sync + 'static {
    fn on_report(&self, report: AnalysisReport);
    fn on_error(&self, error: AnalysisError);
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAnalysisSink {
    reports: Mutex<Vec<AnalysisReport>>,
    errors: Mutex<Vec<String>>,
}

impl InMemoryAnalysisSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<AnalysisReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl AnalysisSink for InMemoryAnalysisSink {
    fn on_report(&self, report: AnalysisReport) {
        self.reports.lock().unwrap().push(report);
    }

    fn on_error(&self, error: AnalysisError) {
        self.errors.lock().unwrap().push(error.to_string());
    }
}

/// Submission failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// A run is already queued or in flight; runs are never interleaved.
    #[error("a run is already queued or in progress")]
    Busy,

    /// The worker has shut down.
    #[error("analysis worker is not running")]
    Disconnected,
}

/// Spawner for the background worker thread.
pub struct AnalysisWorker {
    session: AnalysisSession,
}

impl AnalysisWorker {
    pub fn new(session: AnalysisSession) -> Self {
        Self { session }
    }

    /// Spawn a named worker thread owning the session.
    ///
    /// The submission channel is bounded at one entry: at most one run can
    /// wait behind the in-flight one, anything beyond that is rejected with
    /// [`SubmitError::Busy`].
    pub fn spawn<S: AnalysisSink>(self, name: &'static str, sink: Arc<S>) -> AnalysisWorkerHandle {
        let (submit_tx, submit_rx) = mpsc::sync_channel::<Vec<InventoryItem>>(1);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let current_cancel: Arc<Mutex<Option<CancelToken>>> = Arc::new(Mutex::new(None));

        let status = self.session.status_handle();
        let cancel_slot = Arc::clone(&current_cancel);
        let session = self.session;

        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(name, session, submit_rx, shutdown_rx, cancel_slot, sink))
            .expect("failed to spawn analysis worker thread");

        AnalysisWorkerHandle {
            submit: submit_tx,
            shutdown: shutdown_tx,
            status,
            current_cancel,
            join: Some(join),
        }
    }
}

/// Handle for the running worker (submit + cancel + shutdown).
#[derive(Debug)]
pub struct AnalysisWorkerHandle {
    submit: mpsc::SyncSender<Vec<InventoryItem>>,
    shutdown: mpsc::Sender<()>,
    status: StatusHandle,
    current_cancel: Arc<Mutex<Option<CancelToken>>>,
    join: Option<thread::JoinHandle<()>>,
}

impl AnalysisWorkerHandle {
    /// Submit a batch for a full analysis cycle.
    pub fn submit(&self, items: Vec<InventoryItem>) -> Result<(), SubmitError> {
        match self.submit.try_send(items) {
            Ok(()) => Ok(()),
            Err(mpsc::TrySendError::Full(_)) => Err(SubmitError::Busy),
            Err(mpsc::TrySendError::Disconnected(_)) => Err(SubmitError::Disconnected),
        }
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status.get()
    }

    /// Cancel the in-flight scoring pass, if any.
    ///
    /// Training is not cancellable; a raised token only stops item scoring.
    pub fn cancel_scoring(&self) {
        if let Some(token) = self.current_cancel.lock().unwrap().as_ref() {
            token.cancel();
        }
    }

    /// Gracefully stop the worker thread.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

fn worker_loop<S: AnalysisSink>(
    name: &'static str,
    mut session: AnalysisSession,
    submit_rx: mpsc::Receiver<Vec<InventoryItem>>,
    shutdown_rx: mpsc::Receiver<()>,
    cancel_slot: Arc<Mutex<Option<CancelToken>>>,
    sink: Arc<S>,
) {
    info!(worker = name, "analysis worker started");

    loop {
        // Shutdown has priority.
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match submit_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(items) => {
                session.load_batch(items);

                let cancel = CancelToken::new();
                *cancel_slot.lock().unwrap() = Some(cancel.clone());

                match session.run_analysis(&cancel) {
                    Ok(report) => sink.on_report(report),
                    Err(e) => {
                        warn!(worker = name, error = %e, "analysis run failed");
                        sink.on_error(e);
                    }
                }

                *cancel_slot.lock().unwrap() = None;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    info!(worker = name, "analysis worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AnalysisConfig;
    use restock_ai::{CorpusSpec, TrainConfig};
    use restock_core::ItemId;
    use std::time::Instant;

    fn items(n: usize) -> Vec<InventoryItem> {
        (0..n)
            .map(|i| {
                InventoryItem::new(ItemId::new(), format!("Item #{i}"), 50, 30.0, 9.0).unwrap()
            })
            .collect()
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig::default()
            .with_corpus_spec(CorpusSpec::default().with_samples(200))
            .with_train_config(TrainConfig::default().with_epochs(3))
            .with_seed(17)
    }

    fn wait_for<F: Fn() -> bool>(what: &str, cond: F) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while !cond() {
            assert!(Instant::now() < deadline, "timed out waiting for {what}");
            thread::sleep(Duration::from_millis(10));
        }
    }

    fn sink() -> Arc<InMemoryAnalysisSink> {
        restock_observability::init();
        Arc::new(InMemoryAnalysisSink::new())
    }

    #[test]
    fn submitted_batch_is_analyzed_and_reported() {
        let sink = sink();
        let handle = AnalysisWorker::new(AnalysisSession::new(config()))
            .spawn("analysis-worker-test", Arc::clone(&sink));

        handle.submit(items(5)).unwrap();
        wait_for("report", || !sink.reports().is_empty());

        let report = &sink.reports()[0];
        assert!(!report.cancelled);
        assert_eq!(report.items.len(), 5);
        assert_eq!(handle.status(), AnalysisStatus::Complete);

        handle.shutdown();
    }

    #[test]
    fn excess_submissions_are_rejected_not_interleaved() {
        let sink = sink();
        let handle = AnalysisWorker::new(AnalysisSession::new(config()))
            .spawn("analysis-worker-busy", Arc::clone(&sink));

        // Three rapid submissions: one may start, one may queue, but at
        // least one of the extras must bounce off the bounded queue.
        let first = handle.submit(items(4));
        let second = handle.submit(items(4));
        let third = handle.submit(items(4));
        assert_eq!(first, Ok(()));
        assert!(
            second == Err(SubmitError::Busy) || third == Err(SubmitError::Busy),
            "expected a Busy rejection, got {second:?} / {third:?}"
        );

        // The accepted submissions all drain to completion.
        let accepted = [&first, &second, &third]
            .iter()
            .filter(|r| r.is_ok())
            .count();
        wait_for("all accepted runs", || sink.reports().len() >= accepted);

        handle.shutdown();
    }

    #[test]
    fn failing_run_reaches_the_error_sink() {
        let bad = config().with_corpus_spec(CorpusSpec::default().with_samples(0));
        let sink = sink();
        let handle = AnalysisWorker::new(AnalysisSession::new(bad))
            .spawn("analysis-worker-failing", Arc::clone(&sink));

        handle.submit(items(2)).unwrap();
        wait_for("error", || !sink.errors().is_empty());

        assert!(sink.errors()[0].contains("corpus"));
        assert_eq!(handle.status(), AnalysisStatus::Failed);
        assert!(sink.reports().is_empty());

        handle.shutdown();
    }

    #[test]
    fn shutdown_after_a_run_is_graceful() {
        let sink = sink();
        let handle = AnalysisWorker::new(AnalysisSession::new(config()))
            .spawn("analysis-worker-shutdown", Arc::clone(&sink));

        handle.submit(items(2)).unwrap();
        wait_for("report", || !sink.reports().is_empty());
        handle.shutdown();
    }
}
