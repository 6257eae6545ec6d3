//! `PostgreSQL` implementation of the `CollectionRepository` trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use catalog_core::clock::Clock;
use catalog_core::collection::Collection;
use catalog_core::error::DomainError;
use catalog_core::query::{OrderBy, QueryDescriptor};
use catalog_core::repository::{CollectionRepository, ETagSelector, Page};

use crate::error::{read_error, write_error};

const NAME_FILTER: &str = "($1 = '' OR strpos(lower(name), lower($1)) > 0)";

#[derive(Debug, sqlx::FromRow)]
struct CollectionRow {
    id: Uuid,
    name: String,
    publish_date: Option<DateTime<Utc>>,
    last_updated: DateTime<Utc>,
    etag: String,
}

impl From<CollectionRow> for Collection {
    fn from(row: CollectionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            publish_date: row.publish_date,
            last_updated: Some(row.last_updated),
            etag: row.etag,
        }
    }
}

fn order_clause(order_by: OrderBy) -> &'static str {
    match order_by {
        OrderBy::Default => "seq ASC",
        OrderBy::PublishDate => "publish_date ASC NULLS FIRST, seq ASC",
    }
}

/// PostgreSQL-backed collection repository.
#[derive(Clone)]
pub struct PgCollectionRepository {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgCollectionRepository {
    /// Creates a new `PgCollectionRepository`.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Collection>, DomainError> {
        let row: Option<CollectionRow> = sqlx::query_as(
            "SELECT id, name, publish_date, last_updated, etag FROM collections WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error(&e))?;
        Ok(row.map(Collection::from))
    }
}

#[async_trait]
impl CollectionRepository for PgCollectionRepository {
    async fn list(&self, query: &QueryDescriptor) -> Result<Page<Collection>, DomainError> {
        let total_count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM collections WHERE {NAME_FILTER}"))
                .bind(&query.name_search)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| read_error(&e))?;

        let items = if query.limit == 0 {
            Vec::new()
        } else {
            let sql = format!(
                "SELECT id, name, publish_date, last_updated, etag FROM collections \
                 WHERE {NAME_FILTER} ORDER BY {} LIMIT $2 OFFSET $3",
                order_clause(query.order_by)
            );
            let rows: Vec<CollectionRow> = sqlx::query_as(&sql)
                .bind(&query.name_search)
                .bind(i64::from(query.limit))
                .bind(i64::from(query.offset))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| read_error(&e))?;
            rows.into_iter().map(Collection::from).collect()
        };

        debug!(
            offset = query.offset,
            limit = query.limit,
            order_by = %query.order_by,
            total_count,
            "listed collections"
        );

        Ok(Page {
            items,
            total_count: u64::try_from(total_count).unwrap_or_default(),
        })
    }

    async fn get_by_id(&self, id: Uuid, etag: &ETagSelector) -> Result<Collection, DomainError> {
        let collection = self
            .find_by_id(id)
            .await?
            .ok_or(DomainError::CollectionNotFound(id))?;
        if !etag.matches(&collection.etag) {
            return Err(DomainError::ETagMismatch { collection_id: id });
        }
        Ok(collection)
    }

    async fn get_by_name(&self, name: &str) -> Result<Collection, DomainError> {
        let row: Option<CollectionRow> = sqlx::query_as(
            "SELECT id, name, publish_date, last_updated, etag FROM collections WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error(&e))?;

        row.map(Collection::from)
            .ok_or_else(|| DomainError::CollectionNameNotFound(name.to_owned()))
    }

    async fn add(&self, collection: &Collection) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO collections (id, name, publish_date, last_updated, etag) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 publish_date = EXCLUDED.publish_date, \
                 etag = EXCLUDED.etag",
        )
        .bind(collection.id)
        .bind(&collection.name)
        .bind(collection.publish_date)
        .bind(self.clock.now())
        .bind(&collection.etag)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(&e, &collection.name))?;

        debug!(collection_id = %collection.id, "upserted collection");
        Ok(())
    }

    async fn replace_collection(
        &self,
        collection: &Collection,
        etag: &ETagSelector,
    ) -> Result<Collection, DomainError> {
        let current = self.get_by_id(collection.id, etag).await?;
        let new_etag = current.fingerprint_for_update(collection)?;

        // Conditioned on the ETag just read, so a concurrent writer that got in
        // between makes this affect zero rows.
        let row: Option<CollectionRow> = sqlx::query_as(
            "UPDATE collections SET \
                 name = $3, \
                 publish_date = $4, \
                 etag = $5, \
                 last_updated = GREATEST(last_updated, $6) \
             WHERE id = $1 AND etag = $2 \
             RETURNING id, name, publish_date, last_updated, etag",
        )
        .bind(collection.id)
        .bind(&current.etag)
        .bind(&collection.name)
        .bind(collection.publish_date)
        .bind(&new_etag)
        .bind(self.clock.now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(&e, &collection.name))?;

        match row {
            Some(row) => {
                debug!(collection_id = %collection.id, "replaced collection");
                Ok(row.into())
            }
            None => Err(DomainError::ETagMismatch {
                collection_id: collection.id,
            }),
        }
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| read_error(&e))?;
        Ok(())
    }
}
