use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use super::r#trait::{CacheError, StateCache};

/// In-memory state cache for tests/dev. Lost when dropped.
#[derive(Debug, Default)]
pub struct InMemoryStateCache {
    inner: RwLock<HashMap<String, JsonValue>>,
}

impl InMemoryStateCache {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> CacheError {
    CacheError::Unavailable("lock poisoned".to_string())
}

#[async_trait::async_trait]
impl StateCache for InMemoryStateCache {
    async fn load(&self, name: &str) -> Result<Option<JsonValue>, CacheError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(name).cloned())
    }

    async fn save(&self, name: &str, state: &JsonValue) -> Result<(), CacheError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(name.to_string(), state.clone());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), CacheError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn save_replaces_and_remove_forgets() {
        let cache = InMemoryStateCache::new();
        assert!(cache.load("s").await.unwrap().is_none());

        cache.save("s", &json!({ "v": 1 })).await.unwrap();
        cache.save("s", &json!({ "v": 2 })).await.unwrap();
        assert_eq!(cache.load("s").await.unwrap(), Some(json!({ "v": 2 })));

        cache.remove("s").await.unwrap();
        assert!(cache.load("s").await.unwrap().is_none());
    }
}
