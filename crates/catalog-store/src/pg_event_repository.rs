//! `PostgreSQL` implementation of the `EventRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use catalog_core::error::DomainError;
use catalog_core::event::Event;
use catalog_core::query::EventsQueryDescriptor;
use catalog_core::repository::{EventRepository, Page};

use crate::error::read_error;

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    event_type: String,
    email: String,
    event_date: DateTime<Utc>,
    collection_id: String,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            event_type: row.event_type,
            email: row.email,
            date: row.event_date,
            collection_id: row.collection_id,
        }
    }
}

/// PostgreSQL-backed, read-only event repository.
#[derive(Debug, Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Creates a new `PgEventRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn list_events(&self, query: &EventsQueryDescriptor) -> Result<Page<Event>, DomainError> {
        let total_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM collection_events WHERE collection_id = $1")
                .bind(&query.collection_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| read_error(&e))?;

        let items = if query.limit == 0 {
            Vec::new()
        } else {
            let rows: Vec<EventRow> = sqlx::query_as(
                "SELECT id, event_type, email, event_date, collection_id \
                 FROM collection_events WHERE collection_id = $1 \
                 ORDER BY event_date ASC, id ASC LIMIT $2 OFFSET $3",
            )
            .bind(&query.collection_id)
            .bind(i64::from(query.limit))
            .bind(i64::from(query.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error(&e))?;
            rows.into_iter().map(Event::from).collect()
        };

        Ok(Page {
            items,
            total_count: u64::try_from(total_count).unwrap_or_default(),
        })
    }
}
