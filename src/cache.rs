//! In-memory caching using moka
//!
//! Holds the reservation catalog (one entry, refreshed in the background)
//! and the open form sessions, which expire after a period without use.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::BackendClient;
use crate::pricing::models::PriceCatalog;
use crate::reservations::session::FormSession;

const CATALOG_KEY: &str = "catalog";

/// Open form sessions; handlers lock one before mutating it
pub type SharedSession = Arc<Mutex<FormSession>>;

#[derive(Clone)]
pub struct AppCache {
    /// Reservation catalog (singleton)
    pub catalog: Cache<String, Arc<PriceCatalog>>,
    /// Form sessions (session id -> session)
    pub sessions: Cache<Uuid, SharedSession>,
}

impl AppCache {
    pub fn new(catalog_ttl: Duration, session_idle: Duration) -> Self {
        Self {
            catalog: Cache::builder()
                .max_capacity(1)
                .time_to_live(catalog_ttl)
                .build(),

            // one per open form; abandoned forms fall out after the idle period
            sessions: Cache::builder()
                .max_capacity(10_000)
                .time_to_idle(session_idle)
                .build(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            catalog_cached: self.catalog.contains_key(CATALOG_KEY),
            sessions: self.sessions.entry_count(),
        }
    }

    pub async fn cached_catalog(&self) -> Option<Arc<PriceCatalog>> {
        self.catalog.get(CATALOG_KEY).await
    }

    pub async fn store_catalog(&self, catalog: Arc<PriceCatalog>) {
        self.catalog.insert(CATALOG_KEY.to_string(), catalog).await;
    }

    pub fn invalidate_catalog(&self) {
        self.catalog.invalidate_all();
        info!("Catalog cache invalidated");
    }

    pub async fn session(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.get(&id).await
    }

    pub async fn insert_session(&self, session: FormSession) -> SharedSession {
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, shared.clone()).await;
        shared
    }

    pub async fn remove_session(&self, id: Uuid) {
        self.sessions.invalidate(&id).await;
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub catalog_cached: bool,
    pub sessions: u64,
}

/// Start background cache warmer
///
/// Loads the catalog on startup, then refreshes it every `refresh`.
pub async fn start_cache_warmer(cache: AppCache, backend: BackendClient, refresh: Duration) {
    warm_cache(&cache, &backend).await;

    let mut interval = interval_at(Instant::now() + refresh, refresh);
    loop {
        interval.tick().await;
        warm_cache(&cache, &backend).await;
    }
}

async fn warm_cache(cache: &AppCache, backend: &BackendClient) {
    info!("Starting cache warm-up...");

    match backend.fetch_catalog().await {
        Ok(catalog) if catalog.is_loaded() => cache.store_catalog(Arc::new(catalog)).await,
        Ok(_) => warn!("Backend returned a catalog without prices, not cached"),
        Err(e) => warn!("Failed to warm catalog cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
