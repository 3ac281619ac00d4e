use std::sync::Arc;

use thiserror::Error;

use pawshop_core::ItemId;
use pawshop_inventory::{CatalogItem, ItemPatch};

/// Remote service failure (a negative acknowledgment).
///
/// Every variant means the operation did not take effect as far as the client
/// is concerned. Callers must not mutate local state and must not retry
/// automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("remote API error ({0}): {1}")]
    Api(u16, String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rejected by remote: {0}")]
    Rejected(String),
}

impl RemoteError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Asynchronous CRUD service holding the durable catalog.
///
/// `collection` names the remote table/collection (e.g. `"items"`).
#[async_trait::async_trait]
pub trait CatalogRemote: Send + Sync {
    /// Current snapshot of every record in `collection`.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<CatalogItem>, RemoteError>;

    async fn insert(&self, collection: &str, item: &CatalogItem) -> Result<(), RemoteError>;

    /// Partial update of the record with `id`.
    async fn update(
        &self,
        collection: &str,
        id: &ItemId,
        patch: &ItemPatch,
    ) -> Result<(), RemoteError>;

    async fn delete(&self, collection: &str, id: &ItemId) -> Result<(), RemoteError>;
}

#[async_trait::async_trait]
impl<S> CatalogRemote for Arc<S>
where
    S: CatalogRemote + ?Sized,
{
    async fn fetch_all(&self, collection: &str) -> Result<Vec<CatalogItem>, RemoteError> {
        (**self).fetch_all(collection).await
    }

    async fn insert(&self, collection: &str, item: &CatalogItem) -> Result<(), RemoteError> {
        (**self).insert(collection, item).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &ItemId,
        patch: &ItemPatch,
    ) -> Result<(), RemoteError> {
        (**self).update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &ItemId) -> Result<(), RemoteError> {
        (**self).delete(collection, id).await
    }
}
