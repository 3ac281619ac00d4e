use anyhow::Context;

use pawshop_infra::{
    CatalogRemote, InMemoryCatalogRemote, RestCatalogRemote, ShopConfig, SqliteStateCache,
};
use pawshop_store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pawshop_observability::init();

    let config = ShopConfig::from_env().context("failed to load configuration")?;
    let cache = SqliteStateCache::new(&config.cache_path);

    match config.remote_url.clone() {
        Some(url) => {
            let remote = RestCatalogRemote::new(url, config.api_key.clone());
            run(remote, cache, &config).await
        }
        None => {
            tracing::warn!("PAWSHOP_REMOTE_URL not set; using an empty in-memory catalog service");
            run(InMemoryCatalogRemote::new(), cache, &config).await
        }
    }
}

/// Rehydrate the store, refresh the catalog and report what the client holds.
async fn run<R>(remote: R, cache: SqliteStateCache, config: &ShopConfig) -> anyhow::Result<()>
where
    R: CatalogRemote,
{
    let mut store = Store::open_with_config(remote, cache, config)
        .await
        .with_context(|| format!("failed to open store at {}", config.cache_path.display()))?;

    store
        .load_catalog()
        .await
        .context("failed to load catalog from remote service")?;

    let state = store.state();
    for item in state.catalog().items() {
        tracing::info!(
            item_id = %item.id,
            name = %item.name,
            category = %item.category,
            stock = item.stock,
            price = item.price,
            availability = ?item.availability(),
            "catalog item"
        );
    }

    tracing::info!(
        items = state.catalog().len(),
        categories = ?state.catalog().categories(),
        cart_lines = state.cart().len(),
        cart_total = state.cart().total(),
        transactions = state.transactions().len(),
        revenue = state.transactions().revenue(),
        "store ready"
    );

    Ok(())
}
