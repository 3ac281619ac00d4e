//! Inventory domain module.
//!
//! Catalog items, creation/edit requests and the in-memory catalog
//! collection, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage).

pub mod catalog;
pub mod item;

pub use catalog::Catalog;
pub use item::{Availability, CatalogItem, ItemPatch, NewItem};
