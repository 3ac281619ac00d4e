//! Configuration loading and representation.

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_COLLECTION: &str = "items";
pub const DEFAULT_STORE_NAME: &str = "pawshop-storage";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be blank when set")]
    Blank(&'static str),

    #[error("failed to resolve OS app data directory; set PAWSHOP_CACHE_PATH")]
    NoDataDir,
}

/// Client configuration.
///
/// Environment variables:
/// - `PAWSHOP_REMOTE_URL`: catalog service base URL (unset: in-memory service)
/// - `PAWSHOP_API_KEY`: API key sent to the catalog service
/// - `PAWSHOP_COLLECTION`: remote collection name (default `items`)
/// - `PAWSHOP_STORE_NAME`: key of the cached store snapshot (default `pawshop-storage`)
/// - `PAWSHOP_CACHE_PATH`: SQLite state cache file (default `{data_dir}/pawshop/state.db`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    pub remote_url: Option<String>,
    pub api_key: Option<String>,
    pub collection: String,
    pub store_name: String,
    pub cache_path: PathBuf,
}

impl ShopConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |key: &'static str| -> Option<String> {
            lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };
        let named = |key: &'static str, default: &str| -> Result<String, ConfigError> {
            match lookup(key) {
                None => Ok(default.to_string()),
                Some(v) if v.trim().is_empty() => Err(ConfigError::Blank(key)),
                Some(v) => Ok(v.trim().to_string()),
            }
        };

        let cache_path = match optional("PAWSHOP_CACHE_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_cache_path()?,
        };

        Ok(Self {
            remote_url: optional("PAWSHOP_REMOTE_URL"),
            api_key: optional("PAWSHOP_API_KEY"),
            collection: named("PAWSHOP_COLLECTION", DEFAULT_COLLECTION)?,
            store_name: named("PAWSHOP_STORE_NAME", DEFAULT_STORE_NAME)?,
            cache_path,
        })
    }
}

/// Resolve the default state cache path: `{app_data_dir}/pawshop/state.db`.
fn default_cache_path() -> Result<PathBuf, ConfigError> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or(ConfigError::NoDataDir)?;
    dir.push("pawshop");
    dir.push("state.db");
    Ok(dir)
}
