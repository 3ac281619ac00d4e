use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

/// State cache operation error.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("{context}: {source}")]
    Serialization {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

impl CacheError {
    pub(crate) fn db(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Database { context, source }
    }

    pub(crate) fn json(context: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::Serialization { context, source }
    }
}

/// Durable key-value store for client state snapshots, keyed by store name.
#[async_trait::async_trait]
pub trait StateCache: Send + Sync {
    /// Snapshot stored under `name`, if any.
    async fn load(&self, name: &str) -> Result<Option<JsonValue>, CacheError>;

    /// Store `state` under `name`, replacing any previous snapshot.
    async fn save(&self, name: &str, state: &JsonValue) -> Result<(), CacheError>;

    async fn remove(&self, name: &str) -> Result<(), CacheError>;
}

#[async_trait::async_trait]
impl<S> StateCache for Arc<S>
where
    S: StateCache + ?Sized,
{
    async fn load(&self, name: &str) -> Result<Option<JsonValue>, CacheError> {
        (**self).load(name).await
    }

    async fn save(&self, name: &str, state: &JsonValue) -> Result<(), CacheError> {
        (**self).save(name, state).await
    }

    async fn remove(&self, name: &str) -> Result<(), CacheError> {
        (**self).remove(name).await
    }
}
