//! Shared application state.

use std::sync::Arc;

use catalog_core::query::PaginationConfig;
use catalog_core::repository::{CollectionRepository, EventRepository};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Collection storage.
    pub collections: Arc<dyn CollectionRepository>,
    /// Audit event storage.
    pub events: Arc<dyn EventRepository>,
    /// Pagination defaults and limits applied to every listing.
    pub pagination: PaginationConfig,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        collections: Arc<dyn CollectionRepository>,
        events: Arc<dyn EventRepository>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            collections,
            events,
            pagination,
        }
    }
}
