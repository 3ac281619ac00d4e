//! `pawshop-store`
//!
//! **Responsibility:** the client-side inventory & cart store.
//!
//! This crate provides:
//! - `ShopState`: the pure reducer over catalog, cart and transaction log
//! - `Store`: the remote-synchronised, cache-persisted container built by the
//!   composition root (`main.rs`) and passed by reference
//!
//! The remote catalog service remains the authority for items; local state
//! only changes after it acknowledges.

pub mod error;
pub mod state;
pub mod store;

pub use error::{StockSyncFailure, StoreError};
pub use state::{CheckoutOutcome, CheckoutPlan, RestoreOutcome, ShopState, StockUpdate};
pub use store::Store;
