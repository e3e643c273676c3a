//! Process-wide store handle.
//!
//! The store is built on first use and shared for the life of the
//! process. When the database cannot be opened and the configuration
//! allows it, the mock store is installed instead so the API keeps
//! answering with stub values.

use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::config::DatabaseConfig;
use crate::database::{CharityStore, MockStore, SqliteStore, StoreResult};
use crate::observability::metrics;

/// Shared, type-erased store.
pub type StoreHandle = Arc<dyn CharityStore>;

static STORE: OnceCell<StoreHandle> = OnceCell::const_new();

/// Get the process-wide store, building it on the first call.
///
/// Later calls return the same handle whatever configuration they pass.
/// A failed build is not cached, so the next call tries again.
pub async fn get_store(config: &DatabaseConfig) -> StoreResult<StoreHandle> {
    STORE
        .get_or_try_init(|| build_store(config))
        .await
        .cloned()
}

/// Build a store without touching the process-wide handle.
pub async fn build_store(config: &DatabaseConfig) -> StoreResult<StoreHandle> {
    match SqliteStore::connect(&config.url, config.max_connections).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) if config.fallback_to_mock => {
            tracing::error!(
                url = %config.url,
                error = %e,
                "Database unavailable, falling back to mock store"
            );
            metrics::record_store_fallback();
            Ok(Arc::new(MockStore::new()))
        }
        Err(e) => Err(e),
    }
}
