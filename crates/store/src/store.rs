//! Remote-synchronised, cache-persisted store.

use std::collections::HashSet;

use chrono::Utc;

use pawshop_core::{ItemId, TransactionId};
use pawshop_infra::{CacheError, CatalogRemote, ShopConfig, StateCache};
use pawshop_inventory::{CatalogItem, ItemPatch, NewItem};
use pawshop_sales::AddToCartOutcome;

use crate::error::{StockSyncFailure, StoreError};
use crate::state::{CheckoutOutcome, RestoreOutcome, ShopState};

/// Inventory & cart store of one running client.
///
/// Built once by the composition root and passed by `&mut` to whatever needs
/// it. Operations are issued serially; each one applies its local change in a
/// single step after the remote service has answered, then writes a snapshot
/// to the state cache.
pub struct Store<R, C> {
    remote: R,
    cache: C,
    collection: String,
    store_name: String,
    state: ShopState,
}

impl<R, C> Store<R, C>
where
    R: CatalogRemote,
    C: StateCache,
{
    /// Build a store and rehydrate it from the snapshot cached under
    /// `store_name`.
    ///
    /// A missing snapshot yields an empty state; an undecodable one is logged
    /// and discarded.
    pub async fn open(
        remote: R,
        cache: C,
        collection: impl Into<String>,
        store_name: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let store_name = store_name.into();
        let snapshot = match cache.load(&store_name).await {
            Ok(snapshot) => snapshot,
            Err(err @ CacheError::Serialization { .. }) => {
                tracing::warn!(store = %store_name, "discarding unreadable store snapshot: {err}");
                None
            }
            Err(err) => return Err(err.into()),
        };
        let state = match snapshot {
            Some(snapshot) => match serde_json::from_value::<ShopState>(snapshot) {
                Ok(state) => state,
                Err(err) => {
                    tracing::warn!(store = %store_name, "discarding undecodable store snapshot: {err}");
                    ShopState::default()
                }
            },
            None => ShopState::default(),
        };

        tracing::info!(
            store = %store_name,
            items = state.catalog().len(),
            cart_lines = state.cart().len(),
            transactions = state.transactions().len(),
            "store rehydrated"
        );

        Ok(Self {
            remote,
            cache,
            collection: collection.into(),
            store_name,
            state,
        })
    }

    pub async fn open_with_config(remote: R, cache: C, config: &ShopConfig) -> Result<Self, StoreError> {
        Self::open(remote, cache, config.collection.clone(), config.store_name.clone()).await
    }

    pub fn state(&self) -> &ShopState {
        &self.state
    }

    /// Replace the local catalog with the remote snapshot (last fetch wins).
    pub async fn load_catalog(&mut self) -> Result<usize, StoreError> {
        let items = self
            .remote
            .fetch_all(&self.collection)
            .await
            .inspect_err(|err| tracing::warn!("catalog fetch failed: {err}"))?;

        let count = items.len();
        self.state.replace_catalog(items);
        tracing::info!(items = count, "catalog loaded");
        self.persist().await;
        Ok(count)
    }

    /// Create an item remotely, then append it locally.
    pub async fn create_item(&mut self, request: NewItem) -> Result<CatalogItem, StoreError> {
        let item = request.into_item()?;

        self.remote
            .insert(&self.collection, &item)
            .await
            .inspect_err(|err| tracing::warn!(item_id = %item.id, "item insert failed: {err}"))?;

        self.state.insert_item(item.clone());
        tracing::info!(item_id = %item.id, name = %item.name, "item created");
        self.persist().await;
        Ok(item)
    }

    /// Delete an item remotely, then drop it locally.
    pub async fn delete_item(&mut self, id: &ItemId) -> Result<(), StoreError> {
        self.remote
            .delete(&self.collection, id)
            .await
            .inspect_err(|err| tracing::warn!(item_id = %id, "item delete failed: {err}"))?;

        self.state.remove_item(id);
        tracing::info!(item_id = %id, "item deleted");
        self.persist().await;
        Ok(())
    }

    /// Update an item remotely, then merge the fields locally.
    pub async fn edit_item(&mut self, id: &ItemId, patch: ItemPatch) -> Result<(), StoreError> {
        patch.validate()?;

        self.remote
            .update(&self.collection, id, &patch)
            .await
            .inspect_err(|err| tracing::warn!(item_id = %id, "item update failed: {err}"))?;

        if !self.state.edit_item(id, &patch) {
            tracing::debug!(item_id = %id, "edited item is not in the local catalog");
        }
        tracing::info!(item_id = %id, "item updated");
        self.persist().await;
        Ok(())
    }

    pub async fn add_to_cart(&mut self, id: &ItemId) -> AddToCartOutcome {
        let outcome = self.state.add_to_cart(id);
        if outcome.is_accepted() {
            self.persist().await;
        } else {
            tracing::debug!(item_id = %id, ?outcome, "add to cart ignored");
        }
        outcome
    }

    pub async fn remove_from_cart(&mut self, id: &ItemId) -> bool {
        let removed = self.state.remove_from_cart(id);
        if removed {
            self.persist().await;
        }
        removed
    }

    pub async fn clear_cart(&mut self) {
        self.state.clear_cart();
        self.persist().await;
    }

    /// Check out the cart, pushing each item's new stock to the remote first.
    ///
    /// Updates are sent one by one. Only lines whose update was acknowledged
    /// are committed locally; if any update is refused the call returns
    /// [`StoreError::PartialCheckout`] and the refused lines stay in the cart.
    pub async fn checkout(&mut self) -> Result<CheckoutOutcome, StoreError> {
        let Some(plan) = self.state.plan_checkout() else {
            return Ok(CheckoutOutcome::EmptyCart);
        };

        let mut failures = Vec::new();
        for update in &plan.stock_updates {
            let patch = ItemPatch::stock(update.new_stock);
            if let Err(error) = self
                .remote
                .update(&self.collection, &update.item_id, &patch)
                .await
            {
                tracing::warn!(item_id = %update.item_id, "stock update failed: {error}");
                failures.push(StockSyncFailure {
                    item_id: update.item_id.clone(),
                    error,
                });
            }
        }

        let refused: HashSet<&ItemId> = failures.iter().map(|f| &f.item_id).collect();
        let committed = self
            .state
            .commit_checkout(|id| !refused.contains(id), Utc::now());

        if let Some(tx) = &committed {
            tracing::info!(
                transaction_id = %tx.id,
                lines = tx.items.len(),
                total = tx.total,
                "checkout committed"
            );
            self.persist().await;
        }

        if !failures.is_empty() {
            return Err(StoreError::PartialCheckout { committed, failures });
        }

        match committed {
            Some(tx) => Ok(CheckoutOutcome::Committed(tx)),
            None => Ok(CheckoutOutcome::EmptyCart),
        }
    }

    /// Give back the stock of a past transaction and remove it from the log.
    ///
    /// Local only; the next catalog load lets the remote win.
    pub async fn restore_stock(&mut self, id: &TransactionId) -> RestoreOutcome {
        let outcome = self.state.restore_stock(id);
        match &outcome {
            RestoreOutcome::Restored { transaction } => {
                tracing::info!(transaction_id = %transaction.id, "stock restored");
                self.persist().await;
            }
            RestoreOutcome::NotFound => {
                tracing::debug!(transaction_id = %id, "restore ignored: unknown transaction");
            }
        }
        outcome
    }

    /// Write the current state to the cache. Failures are logged only; the
    /// in-memory state stays authoritative.
    async fn persist(&self) {
        let snapshot = match serde_json::to_value(&self.state) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(store = %self.store_name, "failed to encode store snapshot: {err}");
                return;
            }
        };

        if let Err(err) = self.cache.save(&self.store_name, &snapshot).await {
            tracing::warn!(store = %self.store_name, "failed to persist store snapshot: {err}");
        }
    }
}
