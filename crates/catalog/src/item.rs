use serde::{Deserialize, Serialize};

use restock_core::{DomainError, DomainResult, ItemId};

/// A catalog inventory item, as handed over by the catalog collaborator.
///
/// Immutable once constructed. Scoring never mutates the item; derived
/// fields (prediction score, days of supply) live alongside it in
/// `restock-analysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    current_inventory: u32,
    avg_sales_per_week: f64,
    days_to_replenish: f64,
}

impl InventoryItem {
    /// Validate and construct an item.
    ///
    /// Display name must be non-empty after trimming; sales rate and lead
    /// time must be finite and non-negative. Inventory is non-negative by
    /// type.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        current_inventory: u32,
        avg_sales_per_week: f64,
        days_to_replenish: f64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if !avg_sales_per_week.is_finite() || avg_sales_per_week < 0.0 {
            return Err(DomainError::validation(
                "avg_sales_per_week must be finite and non-negative",
            ));
        }
        if !days_to_replenish.is_finite() || days_to_replenish < 0.0 {
            return Err(DomainError::validation(
                "days_to_replenish must be finite and non-negative",
            ));
        }
        Ok(Self {
            id,
            name,
            current_inventory,
            avg_sales_per_week,
            days_to_replenish,
        })
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_inventory(&self) -> u32 {
        self.current_inventory
    }

    pub fn avg_sales_per_week(&self) -> f64 {
        self.avg_sales_per_week
    }

    pub fn days_to_replenish(&self) -> f64 {
        self.days_to_replenish
    }

    /// Average daily consumption rate. Zero when the item does not sell.
    pub fn avg_sales_per_day(&self) -> f64 {
        self.avg_sales_per_week / 7.0
    }
}
