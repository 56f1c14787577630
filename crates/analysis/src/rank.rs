//! Ordering and filtering of the scored worklist.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::scored::ScoredItem;

/// Worklist filter criteria, as chosen by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub only_reorder: bool,
    pub search_text: String,
}

impl FilterCriteria {
    pub fn with_only_reorder(mut self, only_reorder: bool) -> Self {
        self.only_reorder = only_reorder;
        self
    }

    pub fn with_search_text(mut self, search_text: impl Into<String>) -> Self {
        self.search_text = search_text.into();
        self
    }
}

/// Filter and, once a classification pass has completed, rank the worklist.
///
/// Pure: identical inputs and criteria produce identical output order.
///
/// - `only_reorder` retains items flagged for reorder; it carries no meaning
///   before a pass completes, so it is a no-op while `classified` is false.
/// - A non-empty `search_text` retains items whose display name contains it,
///   case-insensitively.
/// - When `classified`: stable sort, `needs_reorder` descending first, then
///   score descending; ties keep their prior relative order. Unscored and
///   pending items carry no score and sink to the end of their group. When
///   not `classified`: input order, unsorted.
pub fn apply_filter(
    items: &[ScoredItem],
    criteria: &FilterCriteria,
    classified: bool,
) -> Vec<ScoredItem> {
    let needle = criteria.search_text.to_lowercase();

    let mut retained: Vec<ScoredItem> = items
        .iter()
        .filter(|s| !classified || !criteria.only_reorder || s.prediction.needs_reorder())
        .filter(|s| needle.is_empty() || s.item.name().to_lowercase().contains(&needle))
        .cloned()
        .collect();

    if classified {
        retained.sort_by(|a, b| {
            b.prediction
                .needs_reorder()
                .cmp(&a.prediction.needs_reorder())
                .then_with(|| {
                    let sa = a.prediction.score().unwrap_or(f64::NEG_INFINITY);
                    let sb = b.prediction.score().unwrap_or(f64::NEG_INFINITY);
                    sb.partial_cmp(&sa).unwrap_or(Ordering::Equal)
                })
        });
    }

    retained
}
