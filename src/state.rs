//! Shared application state
//!
//! One [`AppState`] is built at startup and handed to every request handler
//! through axum's `State` extractor. It owns the storage handle; nothing is
//! kept in module-level globals.

use std::sync::Arc;
use std::time::Duration;

use crate::store::{MemoryStore, Store};

/// State shared across request handlers
#[derive(Clone)]
pub struct AppState {
    /// Storage handle, backend chosen at startup
    pub store: Arc<dyn Store>,
    /// Artificial latency applied by the async update endpoints
    pub update_delay: Duration,
}

impl AppState {
    /// Build state over an already-constructed store
    pub fn new(store: Arc<dyn Store>, update_delay: Duration) -> Self {
        Self {
            store,
            update_delay,
        }
    }

    /// Build state over a fresh in-memory store
    pub fn in_memory(update_delay: Duration) -> Self {
        Self::new(Arc::new(MemoryStore::new()), update_delay)
    }
}
