//! Query handlers for the collection catalog.
//!
//! Resolve untrusted query parameters, call the repository, and wrap the
//! page in the listing envelope returned to clients.

use catalog_core::collection::Collection;
use catalog_core::error::DomainError;
use catalog_core::event::Event;
use catalog_core::query::{
    PaginationConfig, RawCollectionsQuery, RawPagination, resolve_collections_query,
    resolve_events_query,
};
use catalog_core::repository::{CollectionRepository, ETagSelector, EventRepository, Page};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Read-only view of one page of a listing.
#[derive(Debug, Serialize)]
pub struct ListingView<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Number of items in this page.
    pub count: usize,
    /// The resolved offset.
    pub offset: u32,
    /// The resolved limit.
    pub limit: u32,
    /// Number of matching items across all pages.
    pub total_count: u64,
}

impl<T> ListingView<T> {
    fn from_page(page: Page<T>, offset: u32, limit: u32) -> Self {
        Self {
            count: page.items.len(),
            items: page.items,
            offset,
            limit,
            total_count: page.total_count,
        }
    }
}

/// Lists collections.
///
/// # Errors
///
/// Returns a `DomainError::Validation` for bad query parameters, or the
/// repository error.
pub async fn list_collections(
    raw: &RawCollectionsQuery,
    config: &PaginationConfig,
    repo: &dyn CollectionRepository,
) -> Result<ListingView<Collection>, DomainError> {
    let query = resolve_collections_query(raw, config)?;
    let page = repo.list(&query).await?;
    debug!(returned = page.items.len(), total_count = page.total_count, "collections listed");
    Ok(ListingView::from_page(page, query.offset, query.limit))
}

/// Retrieves a collection by id, optionally conditioned on an `If-Match`
/// value.
///
/// # Errors
///
/// Returns `DomainError::CollectionNotFound` if no collection has the id and
/// `DomainError::ETagMismatch` if `if_match` does not match.
pub async fn get_collection(
    collection_id: Uuid,
    if_match: Option<&str>,
    repo: &dyn CollectionRepository,
) -> Result<Collection, DomainError> {
    let selector = if_match.map_or(ETagSelector::Any, ETagSelector::parse);
    repo.get_by_id(collection_id, &selector).await
}

/// Lists the audit events of one collection, oldest first.
///
/// # Errors
///
/// Returns a `DomainError::Validation` for bad parameters or an empty
/// collection id, or the repository error.
pub async fn list_events(
    collection_id: &str,
    raw: &RawPagination,
    config: &PaginationConfig,
    repo: &dyn EventRepository,
) -> Result<ListingView<Event>, DomainError> {
    let query = resolve_events_query(collection_id, raw, config)?;
    let page = repo.list_events(&query).await?;
    Ok(ListingView::from_page(page, query.offset, query.limit))
}
