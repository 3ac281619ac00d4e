//! Ordered, id-unique collection of catalog items.

use serde::{Deserialize, Serialize};

use pawshop_core::{find_entity, position_of, ItemId};

use crate::item::{CatalogItem, ItemPatch};

/// Local copy of the catalog.
///
/// Keeps insertion order (the order the remote returned or the order items
/// were created in). Ids are unique: inserting an existing id replaces the
/// entry in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CatalogItem>", into = "Vec<CatalogItem>")]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let mut catalog = Self::default();
        catalog.replace_all(items);
        catalog
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&CatalogItem> {
        find_entity(&self.items, id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn stock_of(&self, id: &ItemId) -> Option<u32> {
        self.get(id).map(|item| item.stock)
    }

    /// Replace the whole collection. Last fetch wins; duplicate ids in the
    /// input keep the last occurrence.
    pub fn replace_all(&mut self, items: Vec<CatalogItem>) {
        self.items.clear();
        for item in items {
            self.insert(item);
        }
    }

    /// Append an item, or replace the entry with the same id.
    pub fn insert(&mut self, item: CatalogItem) {
        match position_of(&self.items, &item.id) {
            Some(idx) => self.items[idx] = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<CatalogItem> {
        position_of(&self.items, id).map(|idx| self.items.remove(idx))
    }

    /// Merge `patch` into the item with `id`. Returns `false` if absent.
    pub fn apply_patch(&mut self, id: &ItemId, patch: &ItemPatch) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.merge(patch);
                true
            }
            None => false,
        }
    }

    /// Decrement stock by `quantity`, floored at zero. Returns the new stock.
    pub fn decrement_stock(&mut self, id: &ItemId, quantity: u32) -> Option<u32> {
        let item = self.get_mut(id)?;
        item.stock = item.stock.saturating_sub(quantity);
        Some(item.stock)
    }

    /// Increment stock by `quantity`. Returns the new stock.
    pub fn increment_stock(&mut self, id: &ItemId, quantity: u32) -> Option<u32> {
        let item = self.get_mut(id)?;
        item.stock = item.stock.saturating_add(quantity);
        Some(item.stock)
    }

    /// Items in `category` (case-insensitive; `"all"` matches everything).
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a CatalogItem> + 'a {
        self.items.iter().filter(move |item| item.in_category(category))
    }

    /// Distinct categories, lowercased, in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for item in &self.items {
            let category = item.category.trim().to_lowercase();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    fn get_mut(&mut self, id: &ItemId) -> Option<&mut CatalogItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }
}

impl From<Vec<CatalogItem>> for Catalog {
    fn from(items: Vec<CatalogItem>) -> Self {
        Self::new(items)
    }
}

impl From<Catalog> for Vec<CatalogItem> {
    fn from(catalog: Catalog) -> Self {
        catalog.items
    }
}
