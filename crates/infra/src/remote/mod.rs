//! Remote persistence boundary for the catalog.
//!
//! The remote service holds the durable copy of every catalog item. The client
//! treats it as an opaque asynchronous CRUD service keyed by item id.

pub mod in_memory;
#[cfg(feature = "rest")]
pub mod rest;
pub mod r#trait;

pub use in_memory::{InMemoryCatalogRemote, RemoteOp};
#[cfg(feature = "rest")]
pub use rest::RestCatalogRemote;
pub use r#trait::{CatalogRemote, RemoteError};
