//! Application state shared across handlers.

use std::sync::Arc;

use thermolog_store::Store;
use thermolog_types::RangeNormalizer;

use crate::config::Config;
use crate::query::QueryService;

/// Shared application state.
pub struct AppState {
    /// Query service owning the store handle.
    pub queries: QueryService,
    /// Configuration the server was started with.
    pub config: Config,
}

impl AppState {
    /// Create new application state.
    ///
    /// Single-day requests are normalized with `config.query.day_boundary`.
    pub fn new(store: Store, config: Config) -> Arc<Self> {
        let normalizer = RangeNormalizer::new(config.query.day_boundary);
        Arc::new(Self {
            queries: QueryService::new(store, normalizer),
            config,
        })
    }
}
