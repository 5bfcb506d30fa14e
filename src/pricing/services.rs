//! Catalog loading with cache access.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::{BackendClient, BackendError};
use crate::cache::AppCache;

use super::models::PriceCatalog;

/// Return the cached catalog, fetching it from the backend on a miss.
///
/// A catalog without a price table is returned but not cached, so the next
/// call tries the backend again.
pub async fn load_catalog(
    cache: &AppCache,
    backend: &BackendClient,
) -> Result<Arc<PriceCatalog>, BackendError> {
    if let Some(cached) = cache.cached_catalog().await {
        debug!("Cache HIT for reservation catalog");
        return Ok(cached);
    }
    debug!("Cache MISS for reservation catalog");

    let catalog = Arc::new(backend.fetch_catalog().await?);
    if catalog.is_loaded() {
        cache.store_catalog(catalog.clone()).await;
    } else {
        warn!("Backend catalog has no price table");
    }
    Ok(catalog)
}
