use thiserror::Error;

use pawshop_core::{DomainError, ItemId};
use pawshop_infra::{CacheError, RemoteError};
use pawshop_sales::Transaction;

/// A stock update the remote service refused during checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSyncFailure {
    pub item_id: ItemId,
    pub error: RemoteError,
}

/// Store operation error, surfaced once to the caller (never retried).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Request rejected before reaching the remote service.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Remote service refused the operation; local state is unchanged.
    #[error("remote service failed: {0}")]
    Remote(#[from] RemoteError),

    /// Local state cache could not be read at startup.
    #[error("state cache failed: {0}")]
    Cache(#[from] CacheError),

    /// Some stock updates were refused during checkout.
    ///
    /// Only the acknowledged lines were committed (as `committed`); the
    /// refused lines are still in the cart.
    #[error("checkout incomplete: {} stock update(s) rejected", .failures.len())]
    PartialCheckout {
        committed: Option<Transaction>,
        failures: Vec<StockSyncFailure>,
    },
}
