//! `restock-catalog`
//!
//! **Responsibility:** the catalog collaborator seam.
//!
//! The reorder engine does not own catalog data. This crate defines the
//! `InventoryItem` value type, the paged `CatalogSource` read seam, and an
//! in-memory implementation (plus mock data) for tests and dev. Transport,
//! retries and encoding of a real catalog service live behind the trait,
//! outside this workspace.

pub mod item;
pub mod mock;
pub mod source;

pub use item::InventoryItem;
pub use source::{CatalogError, CatalogPage, CatalogSource, InMemoryCatalog};
