//! Items decorated with what the engine derives for display.

use serde::{Deserialize, Serialize};

use restock_ai::FeatureVector;
use restock_catalog::InventoryItem;

/// Classifier outcome attached to an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Prediction {
    /// No classification pass has covered this item yet.
    Pending,
    /// Model output, score rounded to 3 decimals; `needs_reorder` is
    /// `score > 0.5`.
    Scored { score: f64, needs_reorder: bool },
    /// The item failed inference. Kept visible in the worklist, excluded
    /// from reorder ranking.
    Unscored,
}

impl Prediction {
    pub fn score(&self) -> Option<f64> {
        match self {
            Prediction::Scored { score, .. } => Some(*score),
            _ => None,
        }
    }

    pub fn needs_reorder(&self) -> bool {
        matches!(
            self,
            Prediction::Scored {
                needs_reorder: true,
                ..
            }
        )
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, Prediction::Scored { .. })
    }
}

/// An inventory item plus its derived fields.
///
/// Immutable between scoring passes; a new pass replaces the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: InventoryItem,
    pub prediction: Prediction,
    /// Estimated days until depletion at the average consumption rate, to
    /// 1 decimal. `None` when the item has no sales, never an infinity or
    /// NaN stand-in.
    pub days_of_supply: Option<f64>,
}

impl ScoredItem {
    /// Wrap a raw catalog item ahead of any classification pass.
    pub fn pending(item: InventoryItem) -> Self {
        let days_of_supply = days_of_supply(&item);
        Self {
            item,
            prediction: Prediction::Pending,
            days_of_supply,
        }
    }
}

/// Derive the model input from an item. The (inventory, sales/week,
/// lead-time) ordering is fixed by the feature contract.
pub fn item_features(item: &InventoryItem) -> FeatureVector {
    FeatureVector::new(
        item.current_inventory() as f64,
        item.avg_sales_per_week(),
        item.days_to_replenish(),
    )
}

/// `inventory / daily sales`, to 1 decimal; not applicable without sales.
pub fn days_of_supply(item: &InventoryItem) -> Option<f64> {
    let per_day = item.avg_sales_per_day();
    if per_day == 0.0 {
        None
    } else {
        Some(round1(item.current_inventory() as f64 / per_day))
    }
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub(crate) fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use restock_core::ItemId;

    fn item(inventory: u32, sales_per_week: f64, lead_time: f64) -> InventoryItem {
        InventoryItem::new(ItemId::new(), "Smart Sensor #1", inventory, sales_per_week, lead_time)
            .unwrap()
    }

    #[test]
    fn fast_seller_runs_dry_in_a_day() {
        // 70/wk → 10/day; 10 units last exactly one day.
        assert_eq!(days_of_supply(&item(10, 70.0, 10.0)), Some(1.0));
    }

    #[test]
    fn slow_seller_holds_deep_supply() {
        // 7/wk → 1/day.
        assert_eq!(days_of_supply(&item(1000, 7.0, 5.0)), Some(1000.0));
    }

    #[test]
    fn no_sales_means_not_applicable() {
        let d = days_of_supply(&item(500, 0.0, 5.0));
        assert_eq!(d, None);
    }

    #[test]
    fn supply_is_rounded_to_one_decimal() {
        // 10/wk → 10/7 per day; 10 / (10/7) = 7.0; 16 / (21/7) = 5.333… → 5.3.
        assert_eq!(days_of_supply(&item(16, 21.0, 5.0)), Some(5.3));
    }

    #[test]
    fn pending_wrapper_derives_supply_but_no_prediction() {
        let scored = ScoredItem::pending(item(10, 70.0, 10.0));
        assert_eq!(scored.prediction, Prediction::Pending);
        assert_eq!(scored.days_of_supply, Some(1.0));
        assert!(!scored.prediction.needs_reorder());
        assert_eq!(scored.prediction.score(), None);
    }

    #[test]
    fn feature_ordering_matches_the_contract() {
        let f = item_features(&item(120, 35.0, 10.0));
        assert_eq!(f.as_array(), [120.0, 35.0, 10.0]);
    }
}
