//! Repository abstractions over the persistent document store.
//!
//! Implementations must provide atomic single-document compare-and-set for
//! [`CollectionRepository::replace_collection`]; nothing else needs locking.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::collection::Collection;
use crate::error::DomainError;
use crate::event::Event;
use crate::query::{EventsQueryDescriptor, QueryDescriptor};

/// The `If-Match` wildcard.
pub const ANY_ETAG: &str = "*";

/// Which stored ETag an operation is conditioned on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ETagSelector {
    /// Skip the ETag check.
    Any,
    /// Require the stored ETag to equal this value.
    Exact(String),
}

impl ETagSelector {
    /// Parses an `If-Match` header value.
    ///
    /// `*` selects [`ETagSelector::Any`]. Otherwise a weak `W/` prefix and
    /// surrounding quotes are removed.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == ANY_ETAG {
            return Self::Any;
        }
        let value = value.strip_prefix("W/").unwrap_or(value);
        Self::Exact(value.trim_matches('"').to_owned())
    }

    /// Returns `true` if a document stored with `etag` satisfies this selector.
    #[must_use]
    pub fn matches(&self, etag: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == etag,
        }
    }
}

/// One page of a listing plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Number of matching items before pagination.
    pub total_count: u64,
}

impl<T> Page<T> {
    /// An empty page over an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

/// Read/write access to collections.
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Lists collections matching `query.name_search`, ordered by
    /// `query.order_by`, skipping `query.offset` and returning at most
    /// `query.limit` items.
    async fn list(&self, query: &QueryDescriptor) -> Result<Page<Collection>, DomainError>;

    /// Loads one collection.
    ///
    /// Fails with `CollectionNotFound` if `id` is unknown and with
    /// `ETagMismatch` if `etag` does not select the stored ETag.
    async fn get_by_id(&self, id: Uuid, etag: &ETagSelector) -> Result<Collection, DomainError>;

    /// Loads the collection with exactly this name.
    async fn get_by_name(&self, name: &str) -> Result<Collection, DomainError>;

    /// Persists a new collection whose `id` and `etag` are already set.
    ///
    /// Upserts by id; `last_updated` is only stamped on insert. Does not check
    /// name uniqueness beyond whatever constraint the store itself enforces.
    async fn add(&self, collection: &Collection) -> Result<(), DomainError>;

    /// Atomically replaces the collection with `collection.id`, provided the
    /// stored ETag is selected by `etag`, and returns the stored result with
    /// its new ETag.
    async fn replace_collection(
        &self,
        collection: &Collection,
        etag: &ETagSelector,
    ) -> Result<Collection, DomainError>;

    /// Checks the store is reachable.
    async fn ping(&self) -> Result<(), DomainError>;
}

/// Read-only access to collection events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Lists events for `query.collection_id`, oldest first.
    async fn list_events(&self, query: &EventsQueryDescriptor) -> Result<Page<Event>, DomainError>;
}
