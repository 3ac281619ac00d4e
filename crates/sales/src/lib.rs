//! Sales domain module: shopping cart and checkout transactions.
//!
//! This crate contains business rules for the cart and the transaction log,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod cart;
pub mod transaction;

pub use cart::{AddRejection, AddToCartOutcome, Cart, CartLine};
pub use transaction::{lines_total, Transaction, TransactionLog};
