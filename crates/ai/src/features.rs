use serde::{Deserialize, Serialize};

/// The shared numeric representation of an inventory item.
///
/// Ordering is load-bearing: `(current_inventory, avg_sales_per_week,
/// days_to_replenish)`, raw and unnormalized. The classifier's learned
/// weights are only valid under this exact ordering and scale, so training
/// and inference both go through this type. No independent lifecycle;
/// recomputed on demand from the item.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub current_inventory: f64,
    pub avg_sales_per_week: f64,
    pub days_to_replenish: f64,
}

impl FeatureVector {
    pub fn new(current_inventory: f64, avg_sales_per_week: f64, days_to_replenish: f64) -> Self {
        Self {
            current_inventory,
            avg_sales_per_week,
            days_to_replenish,
        }
    }

    /// Model input layout. Index order must never change.
    pub fn as_array(&self) -> [f64; 3] {
        [
            self.current_inventory,
            self.avg_sales_per_week,
            self.days_to_replenish,
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.current_inventory.is_finite()
            && self.avg_sales_per_week.is_finite()
            && self.days_to_replenish.is_finite()
    }

    /// Average daily consumption rate. Zero when the item does not sell.
    pub fn avg_sales_per_day(&self) -> f64 {
        self.avg_sales_per_week / 7.0
    }
}
