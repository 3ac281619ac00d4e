//! Infrastructure layer: remote catalog service, local state cache, config.

pub mod cache;
pub mod config;
pub mod remote;

pub use cache::{CacheError, InMemoryStateCache, SqliteStateCache, StateCache};
pub use config::{ConfigError, ShopConfig};
pub use remote::{CatalogRemote, InMemoryCatalogRemote, RemoteError, RemoteOp};
#[cfg(feature = "rest")]
pub use remote::RestCatalogRemote;
