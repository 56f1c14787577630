//! Reorder decision sources.
//!
//! The repository carries two competing decision paths: the trained
//! classifier and a deterministic reorder-point formula. They use different
//! safety margins (a 1.5× multiplier on lead-time demand vs. two additive
//! days of safety stock) and are deliberately not reconciled. Callers pick
//! one explicitly; nothing here merges or prefers one over the other.

use serde::{Deserialize, Serialize};

use crate::error::InferenceError;
use crate::features::FeatureVector;
use crate::model::ReorderModel;

/// Decision threshold on the classifier's sigmoid output.
pub const SCORE_THRESHOLD: f64 = 0.5;

/// A source of reorder decisions for a single item's features.
pub trait DecisionStrategy: Send + Sync {
    fn needs_reorder(&self, features: &FeatureVector) -> Result<bool, InferenceError>;
}

/// Decide from the trained classifier: reorder when score > 0.5.
#[derive(Debug, Clone)]
pub struct LearnedClassifierStrategy {
    model: ReorderModel,
}

impl LearnedClassifierStrategy {
    pub fn new(model: ReorderModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ReorderModel {
        &self.model
    }
}

impl DecisionStrategy for LearnedClassifierStrategy {
    fn needs_reorder(&self, features: &FeatureVector) -> Result<bool, InferenceError> {
        Ok(self.model.score(features)? > SCORE_THRESHOLD)
    }
}

/// What the rule-based path derives for an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Reorder threshold in units, ceiled for display.
    pub reorder_point: f64,
    pub needs_reorder: bool,
}

/// Decide from the deterministic reorder-point formula.
///
/// Lead time is padded with additive safety-stock days (default 2), then
/// multiplied by the daily consumption rate. Note the margin differs from
/// the corpus labeling rule's multiplicative 1.5; see the module docs.
#[derive(Debug, Clone)]
pub struct DeterministicRuleStrategy {
    safety_stock_days: f64,
}

impl Default for DeterministicRuleStrategy {
    fn default() -> Self {
        Self {
            safety_stock_days: 2.0,
        }
    }
}

impl DeterministicRuleStrategy {
    pub fn with_safety_stock_days(mut self, safety_stock_days: f64) -> Self {
        self.safety_stock_days = safety_stock_days;
        self
    }

    /// Full rule outcome, for callers that display the reorder point.
    ///
    /// The comparison uses the raw reorder point; only the reported value is
    /// ceiled.
    pub fn evaluate(&self, features: &FeatureVector) -> RuleOutcome {
        let effective_lead_time = features.days_to_replenish + self.safety_stock_days;
        let reorder_point = features.avg_sales_per_day() * effective_lead_time;

        RuleOutcome {
            reorder_point: reorder_point.ceil(),
            needs_reorder: features.current_inventory < reorder_point,
        }
    }
}

impl DecisionStrategy for DeterministicRuleStrategy {
    fn needs_reorder(&self, features: &FeatureVector) -> Result<bool, InferenceError> {
        Ok(self.evaluate(features).needs_reorder)
    }
}
