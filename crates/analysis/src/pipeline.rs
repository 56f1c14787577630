//! Batch scoring of live items against one trained model snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::warn;

use restock_ai::{ReorderModel, SCORE_THRESHOLD};
use restock_catalog::InventoryItem;

use crate::scored::{days_of_supply, item_features, round3, Prediction, ScoredItem};

/// Caller-provided cancellation signal for an in-flight scoring batch.
///
/// One-shot: once raised it stays raised. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Output of one scoring pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredBatch {
    pub items: Vec<ScoredItem>,
    /// True when the cancel token fired before every item was scored. Items
    /// the pass never reached stay `Pending`.
    pub cancelled: bool,
}

/// Score a batch of items, one [`ScoredItem`] per input.
///
/// Identity is matched by item id; output sequence order is not part of the
/// contract, the ranking stage re-sorts. Items are scored concurrently,
/// all against the same `&ReorderModel` snapshot (the borrow guarantees the
/// model cannot be mutated mid-batch). An item that fails inference is
/// marked [`Prediction::Unscored`] and the rest of the batch completes.
pub fn score_batch(
    model: &ReorderModel,
    items: &[InventoryItem],
    cancel: &CancelToken,
) -> ScoredBatch {
    let items: Vec<ScoredItem> = items
        .par_iter()
        .map(|item| {
            if cancel.is_cancelled() {
                ScoredItem::pending(item.clone())
            } else {
                score_item(model, item)
            }
        })
        .collect();

    ScoredBatch {
        cancelled: cancel.is_cancelled(),
        items,
    }
}

fn score_item(model: &ReorderModel, item: &InventoryItem) -> ScoredItem {
    let prediction = match model.score(&item_features(item)) {
        Ok(raw) if raw.is_finite() => {
            let score = round3(raw);
            Prediction::Scored {
                score,
                needs_reorder: score > SCORE_THRESHOLD,
            }
        }
        Ok(raw) => {
            // Extreme (but finite) feature values can overflow the forward
            // pass; a NaN score must never reach callers.
            warn!(item = %item.id(), raw, "non-finite model output, marking unscored");
            Prediction::Unscored
        }
        Err(e) => {
            warn!(item = %item.id(), error = %e, "inference failed, marking unscored");
            Prediction::Unscored
        }
    };

    ScoredItem {
        days_of_supply: days_of_supply(item),
        item: item.clone(),
        prediction,
    }
}
