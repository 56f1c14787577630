use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::InventoryItem;

/// One page of catalog items plus collection meta counters.
///
/// Pages are 1-based. `last_page` is always at least 1, even for an empty
/// catalog, so "page N of M" renders sensibly downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub items: Vec<InventoryItem>,
    pub total_items: u64,
    pub last_page: u32,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The page request itself was malformed (page/page_size are 1-based).
    #[error("invalid page request: {0}")]
    InvalidPage(String),

    /// The backing catalog could not be reached or answered garbage.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read seam to the external catalog service.
///
/// The engine treats the catalog purely as an ordered sequence of items with
/// meta counters. Implementors adapt whatever transport the catalog actually
/// lives behind; retry/backoff policy belongs to them, not here.
pub trait CatalogSource: Send + Sync {
    fn fetch_page(&self, page: u32, page_size: u32) -> Result<CatalogPage, CatalogError>;
}

/// In-process catalog over a fixed item list (tests/dev).
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: Vec<InventoryItem>,
}

impl InMemoryCatalog {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CatalogSource for InMemoryCatalog {
    fn fetch_page(&self, page: u32, page_size: u32) -> Result<CatalogPage, CatalogError> {
        if page == 0 || page_size == 0 {
            return Err(CatalogError::InvalidPage(
                "page and page_size are 1-based and must be non-zero".to_string(),
            ));
        }

        let total_items = self.items.len() as u64;
        let last_page = (total_items.div_ceil(page_size as u64)).max(1) as u32;

        // A page past the end is an empty page, not an error.
        let start = (page as usize - 1).saturating_mul(page_size as usize);
        let items = if start >= self.items.len() {
            Vec::new()
        } else {
            let end = (start + page_size as usize).min(self.items.len());
            self.items[start..end].to_vec()
        };

        Ok(CatalogPage {
            items,
            total_items,
            last_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restock_core::ItemId;

    fn items(n: usize) -> Vec<InventoryItem> {
        (0..n)
            .map(|i| {
                InventoryItem::new(ItemId::new(), format!("Item {i}"), 100, 10.0, 5.0).unwrap()
            })
            .collect()
    }

    #[test]
    fn pages_are_one_based_and_sized() {
        let catalog = InMemoryCatalog::new(items(45));

        let page = catalog.fetch_page(1, 20).unwrap();
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.total_items, 45);
        assert_eq!(page.last_page, 3);

        let page = catalog.fetch_page(3, 20).unwrap();
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn page_past_the_end_is_empty_not_an_error() {
        let catalog = InMemoryCatalog::new(items(5));
        let page = catalog.fetch_page(4, 20).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 5);
    }

    #[test]
    fn zero_page_or_size_is_rejected() {
        let catalog = InMemoryCatalog::new(items(5));
        assert!(matches!(
            catalog.fetch_page(0, 20),
            Err(CatalogError::InvalidPage(_))
        ));
        assert!(matches!(
            catalog.fetch_page(1, 0),
            Err(CatalogError::InvalidPage(_))
        ));
    }

    #[test]
    fn empty_catalog_still_reports_one_page() {
        let catalog = InMemoryCatalog::new(Vec::new());
        let page = catalog.fetch_page(1, 20).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.last_page, 1);
        assert_eq!(page.total_items, 0);
    }
}
