//! Ludicus reservation form engine.
//!
//! Keeps the state of the reservation form server-side: catalog-driven
//! selection cascade, add-on ledger, live total, and the read-only detail
//! and contract views of stored reservations.

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;
pub mod reservations;
pub mod routes;

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::cache::AppCache;
use crate::config::Config;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub cache: AppCache,
    pub backend: BackendClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, backend: BackendClient) -> Self {
        let cache = AppCache::new(config.catalog_ttl, config.session_idle);
        Self {
            cache,
            backend,
            config: Arc::new(config),
        }
    }
}

pub use routes::router;
