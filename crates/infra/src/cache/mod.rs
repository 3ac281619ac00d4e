//! Durable local key-value cache for the client's own state.
//!
//! Snapshots are stored as JSON documents under a fixed store name and
//! rehydrated once at startup. The cache is disposable: the remote service
//! stays the authority for the catalog.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemoryStateCache;
pub use sqlite::SqliteStateCache;
pub use r#trait::{CacheError, StateCache};
