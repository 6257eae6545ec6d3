//! Integration tests for `PgEventRepository`.
//!
//! `#[sqlx::test]` creates a fresh database per test on the server named by
//! `DATABASE_URL`.

use catalog_core::query::EventsQueryDescriptor;
use catalog_core::repository::EventRepository;
use catalog_store::PgEventRepository;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Inserts an event the way the external emitting process would.
async fn insert_event(pool: &PgPool, collection_id: &str, event_type: &str, date: DateTime<Utc>) {
    sqlx::query(
        "INSERT INTO collection_events (id, event_type, email, event_date, collection_id) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(event_type)
    .bind("test@test.com")
    .bind(date)
    .bind(collection_id)
    .execute(pool)
    .await
    .unwrap();
}

fn query(collection_id: &str, offset: u32, limit: u32) -> EventsQueryDescriptor {
    EventsQueryDescriptor {
        collection_id: collection_id.to_owned(),
        offset,
        limit,
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_events_returns_empty_page_for_unknown_collection(pool: PgPool) {
    let repo = PgEventRepository::new(pool);

    let page = repo.list_events(&query("nope", 0, 10)).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_events_orders_by_date_and_isolates_collections(pool: PgPool) {
    let day = |d| Utc.with_ymd_and_hms(2026, 1, d, 10, 0, 0).unwrap();
    insert_event(&pool, "123", "UPDATED", day(3)).await;
    insert_event(&pool, "123", "CREATED", day(1)).await;
    insert_event(&pool, "456", "CREATED", day(2)).await;
    let repo = PgEventRepository::new(pool);

    let page = repo.list_events(&query("123", 0, 10)).await.unwrap();

    assert_eq!(page.total_count, 2);
    let types: Vec<&str> = page.items.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, ["CREATED", "UPDATED"]);
    assert!(page.items.iter().all(|e| e.collection_id == "123"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_events_paginates(pool: PgPool) {
    for d in 1..=3 {
        insert_event(
            &pool,
            "123",
            "UPDATED",
            Utc.with_ymd_and_hms(2026, 1, d, 10, 0, 0).unwrap(),
        )
        .await;
    }
    let repo = PgEventRepository::new(pool);

    let page = repo.list_events(&query("123", 2, 5)).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total_count, 3);
}
