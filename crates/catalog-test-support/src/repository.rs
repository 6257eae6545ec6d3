//! In-memory and failing implementations of the catalog repository traits.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use catalog_core::clock::Clock;
use catalog_core::collection::Collection;
use catalog_core::error::DomainError;
use catalog_core::event::Event;
use catalog_core::query::{EventsQueryDescriptor, OrderBy, QueryDescriptor};
use catalog_core::repository::{CollectionRepository, ETagSelector, EventRepository, Page};
use uuid::Uuid;

fn paginate<T>(items: Vec<T>, offset: u32, limit: u32) -> Page<T> {
    let total_count = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    Page {
        items: items.into_iter().skip(offset).take(limit).collect(),
        total_count,
    }
}

/// A collection repository backed by a `Vec` in insertion order.
///
/// Mirrors the PostgreSQL repository: the name is unique, `add` upserts by id,
/// and `replace_collection` is a compare-and-set under a single lock.
pub struct InMemoryCollectionRepository {
    clock: Arc<dyn Clock>,
    collections: Mutex<Vec<Collection>>,
}

impl InMemoryCollectionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
            collections: Mutex::new(Vec::new()),
        }
    }

    /// Creates a repository pre-loaded with `collections`, in order.
    ///
    /// Collections without an ETag get their creation fingerprint and
    /// collections without `last_updated` are stamped with the clock.
    ///
    /// # Panics
    ///
    /// Panics if a fingerprint cannot be computed.
    #[must_use]
    pub fn with_collections(clock: impl Clock + 'static, collections: Vec<Collection>) -> Self {
        let now = clock.now();
        let seeded = collections
            .into_iter()
            .map(|mut collection| {
                if collection.etag.is_empty() {
                    collection.etag = collection.creation_fingerprint().unwrap();
                }
                collection.last_updated.get_or_insert(now);
                collection
            })
            .collect();
        Self {
            clock: Arc::new(clock),
            collections: Mutex::new(seeded),
        }
    }

    /// Returns a copy of every stored collection.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn snapshot(&self) -> Vec<Collection> {
        self.collections.lock().unwrap().clone()
    }

    fn ensure_name_free(
        stored: &[Collection],
        id: Uuid,
        name: &str,
    ) -> Result<(), DomainError> {
        if stored.iter().any(|c| c.id != id && c.name == name) {
            return Err(DomainError::CollectionNameAlreadyExists(name.to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionRepository for InMemoryCollectionRepository {
    async fn list(&self, query: &QueryDescriptor) -> Result<Page<Collection>, DomainError> {
        let needle = query.name_search.to_lowercase();
        let mut matching: Vec<Collection> = self
            .collections
            .lock()
            .unwrap()
            .iter()
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        if query.order_by == OrderBy::PublishDate {
            // Stable sort: ties keep insertion order, `None` sorts first.
            matching.sort_by_key(|c| c.publish_date);
        }

        Ok(paginate(matching, query.offset, query.limit))
    }

    async fn get_by_id(&self, id: Uuid, etag: &ETagSelector) -> Result<Collection, DomainError> {
        let stored = self.collections.lock().unwrap();
        let collection = stored
            .iter()
            .find(|c| c.id == id)
            .ok_or(DomainError::CollectionNotFound(id))?;
        if !etag.matches(&collection.etag) {
            return Err(DomainError::ETagMismatch { collection_id: id });
        }
        Ok(collection.clone())
    }

    async fn get_by_name(&self, name: &str) -> Result<Collection, DomainError> {
        self.collections
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| DomainError::CollectionNameNotFound(name.to_owned()))
    }

    async fn add(&self, collection: &Collection) -> Result<(), DomainError> {
        let mut stored = self.collections.lock().unwrap();
        Self::ensure_name_free(&stored, collection.id, &collection.name)?;

        if let Some(existing) = stored.iter_mut().find(|c| c.id == collection.id) {
            existing.name.clone_from(&collection.name);
            existing.publish_date = collection.publish_date;
            existing.etag.clone_from(&collection.etag);
        } else {
            let mut inserted = collection.clone();
            inserted.last_updated = Some(self.clock.now());
            stored.push(inserted);
        }
        Ok(())
    }

    async fn replace_collection(
        &self,
        collection: &Collection,
        etag: &ETagSelector,
    ) -> Result<Collection, DomainError> {
        let mut stored = self.collections.lock().unwrap();
        let index = stored
            .iter()
            .position(|c| c.id == collection.id)
            .ok_or(DomainError::CollectionNotFound(collection.id))?;
        if !etag.matches(&stored[index].etag) {
            return Err(DomainError::ETagMismatch {
                collection_id: collection.id,
            });
        }
        Self::ensure_name_free(&stored, collection.id, &collection.name)?;

        let new_etag = stored[index].fingerprint_for_update(collection)?;
        let now = self.clock.now();
        let current = &mut stored[index];
        current.name.clone_from(&collection.name);
        current.publish_date = collection.publish_date;
        current.etag = new_etag;
        current.last_updated = Some(current.last_updated.map_or(now, |prev| prev.max(now)));
        Ok(current.clone())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// An event repository serving a fixed set of events.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: Vec<Event>,
}

impl InMemoryEventRepository {
    /// Creates a repository holding `events`.
    #[must_use]
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn list_events(&self, query: &EventsQueryDescriptor) -> Result<Page<Event>, DomainError> {
        let mut matching: Vec<Event> = self
            .events
            .iter()
            .filter(|e| e.collection_id == query.collection_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        Ok(paginate(matching, query.offset, query.limit))
    }
}

/// A collection repository whose every call fails with an infrastructure
/// error. Useful for testing error-handling paths.
#[derive(Debug)]
pub struct FailingCollectionRepository;

#[async_trait]
impl CollectionRepository for FailingCollectionRepository {
    async fn list(&self, _query: &QueryDescriptor) -> Result<Page<Collection>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn get_by_id(&self, _id: Uuid, _etag: &ETagSelector) -> Result<Collection, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn get_by_name(&self, _name: &str) -> Result<Collection, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn add(&self, _collection: &Collection) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn replace_collection(
        &self,
        _collection: &Collection,
        _etag: &ETagSelector,
    ) -> Result<Collection, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// An event repository that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingEventRepository;

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn list_events(
        &self,
        _query: &EventsQueryDescriptor,
    ) -> Result<Page<Event>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
