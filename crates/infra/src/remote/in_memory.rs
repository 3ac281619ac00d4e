use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use pawshop_core::ItemId;
use pawshop_inventory::{CatalogItem, ItemPatch};

use super::r#trait::{CatalogRemote, RemoteError};

/// Remote operation kind (used for failure injection and call inspection).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    FetchAll,
    Insert,
    Update,
    Delete,
}

/// In-memory catalog service.
///
/// Intended for tests/dev. Behaves like a keyed table per collection:
/// inserting a duplicate id and updating a missing id are rejected, deleting a
/// missing id succeeds. Failures can be injected per operation, or per item id
/// for updates.
#[derive(Debug, Default)]
pub struct InMemoryCatalogRemote {
    collections: RwLock<HashMap<String, Vec<CatalogItem>>>,
    failing_ops: RwLock<HashSet<RemoteOp>>,
    failing_updates: RwLock<HashSet<ItemId>>,
    calls: RwLock<Vec<RemoteOp>>,
}

fn poisoned() -> RemoteError {
    RemoteError::rejected("lock poisoned")
}

impl InMemoryCatalogRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `collection` with `items`.
    pub fn with_items(collection: &str, items: Vec<CatalogItem>) -> Self {
        let remote = Self::new();
        if let Ok(mut map) = remote.collections.write() {
            map.insert(collection.to_string(), items);
        }
        remote
    }

    /// Make every subsequent `op` fail.
    pub fn fail(&self, op: RemoteOp) {
        if let Ok(mut ops) = self.failing_ops.write() {
            ops.insert(op);
        }
    }

    /// Make subsequent updates of `id` fail.
    pub fn fail_update_for(&self, id: ItemId) {
        if let Ok(mut ids) = self.failing_updates.write() {
            ids.insert(id);
        }
    }

    /// Clear all injected failures.
    pub fn heal(&self) {
        if let Ok(mut ops) = self.failing_ops.write() {
            ops.clear();
        }
        if let Ok(mut ids) = self.failing_updates.write() {
            ids.clear();
        }
    }

    /// Records currently held for `collection`.
    pub fn items(&self, collection: &str) -> Vec<CatalogItem> {
        self.collections
            .read()
            .ok()
            .and_then(|map| map.get(collection).cloned())
            .unwrap_or_default()
    }

    /// Every operation attempted so far, in order (failed ones included).
    pub fn calls(&self) -> Vec<RemoteOp> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    fn begin(&self, op: RemoteOp) -> Result<(), RemoteError> {
        self.calls.write().map_err(|_| poisoned())?.push(op);
        let failing = self.failing_ops.read().map_err(|_| poisoned())?;
        if failing.contains(&op) {
            return Err(RemoteError::Api(503, format!("{op:?} unavailable")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogRemote for InMemoryCatalogRemote {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<CatalogItem>, RemoteError> {
        self.begin(RemoteOp::FetchAll)?;
        let map = self.collections.read().map_err(|_| poisoned())?;
        Ok(map.get(collection).cloned().unwrap_or_default())
    }

    async fn insert(&self, collection: &str, item: &CatalogItem) -> Result<(), RemoteError> {
        self.begin(RemoteOp::Insert)?;
        let mut map = self.collections.write().map_err(|_| poisoned())?;
        let rows = map.entry(collection.to_string()).or_default();
        if rows.iter().any(|row| row.id == item.id) {
            return Err(RemoteError::rejected(format!(
                "duplicate key value violates unique constraint (id={})",
                item.id
            )));
        }
        rows.push(item.clone());
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &ItemId,
        patch: &ItemPatch,
    ) -> Result<(), RemoteError> {
        self.begin(RemoteOp::Update)?;
        if self.failing_updates.read().map_err(|_| poisoned())?.contains(id) {
            return Err(RemoteError::Api(500, format!("update of {id} failed")));
        }
        let mut map = self.collections.write().map_err(|_| poisoned())?;
        let row = map
            .get_mut(collection)
            .and_then(|rows| rows.iter_mut().find(|row| &row.id == id))
            .ok_or_else(|| RemoteError::rejected(format!("no row with id={id}")))?;
        row.merge(patch);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &ItemId) -> Result<(), RemoteError> {
        self.begin(RemoteOp::Delete)?;
        let mut map = self.collections.write().map_err(|_| poisoned())?;
        if let Some(rows) = map.get_mut(collection) {
            rows.retain(|row| &row.id != id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEMS: &str = "items";

    fn item(id: &str, stock: u32) -> CatalogItem {
        CatalogItem {
            id: ItemId::new(id).unwrap(),
            name: id.to_string(),
            stock,
            price: 10,
            category: "kucing".to_string(),
        }
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let remote = InMemoryCatalogRemote::new();
        remote.insert(ITEMS, &item("a", 1)).await.unwrap();
        remote
            .update(ITEMS, &ItemId::new("a").unwrap(), &ItemPatch::stock(7))
            .await
            .unwrap();
        let rows = remote.fetch_all(ITEMS).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stock, 7);

        remote.delete(ITEMS, &ItemId::new("a").unwrap()).await.unwrap();
        assert!(remote.items(ITEMS).is_empty());
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let remote = InMemoryCatalogRemote::with_items(ITEMS, vec![item("a", 1)]);
        let err = remote.insert(ITEMS, &item("a", 2)).await.unwrap_err();
        assert!(matches!(err, RemoteError::Rejected(_)));
        assert_eq!(remote.items(ITEMS)[0].stock, 1);
    }

    #[tokio::test]
    async fn injected_failures_and_heal() {
        let remote = InMemoryCatalogRemote::with_items(ITEMS, vec![item("a", 1), item("b", 1)]);
        remote.fail(RemoteOp::FetchAll);
        remote.fail_update_for(ItemId::new("b").unwrap());

        assert!(remote.fetch_all(ITEMS).await.is_err());
        assert!(remote
            .update(ITEMS, &ItemId::new("a").unwrap(), &ItemPatch::stock(0))
            .await
            .is_ok());
        assert!(remote
            .update(ITEMS, &ItemId::new("b").unwrap(), &ItemPatch::stock(0))
            .await
            .is_err());

        remote.heal();
        assert_eq!(remote.fetch_all(ITEMS).await.unwrap().len(), 2);
        assert_eq!(
            remote.calls(),
            vec![RemoteOp::FetchAll, RemoteOp::Update, RemoteOp::Update, RemoteOp::FetchAll]
        );
    }
}
