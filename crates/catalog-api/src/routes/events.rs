//! Route for a collection's audit events.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;

use catalog_collections::application::query_handlers::{self, ListingView};
use catalog_core::event::Event;
use catalog_core::query::RawPagination;

use super::{QueryPairs, query_pairs};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /collections/{collection_id}/events
#[instrument(skip(state))]
async fn list_events(
    State(state): State<AppState>,
    Path(collection_id): Path<String>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<ListingView<Event>>, ApiError> {
    let raw = RawPagination::from_pairs(&query_pairs(query)?);
    let view =
        query_handlers::list_events(&collection_id, &raw, &state.pagination, &*state.events)
            .await?;
    Ok(Json(view))
}

/// Returns the router for collection events.
pub fn router() -> Router<AppState> {
    Router::new().route("/collections/{collection_id}/events", get(list_events))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use catalog_core::query::PaginationConfig;
    use catalog_core::repository::EventRepository;
    use catalog_test_support::{
        FailingEventRepository, FixedClock, InMemoryCollectionRepository, InMemoryEventRepository,
    };
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app_state_with(events: Arc<dyn EventRepository>) -> AppState {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        AppState::new(
            Arc::new(InMemoryCollectionRepository::new(clock)),
            events,
            PaginationConfig::default(),
        )
    }

    fn event(collection_id: &str, event_type: &str, day: u32) -> Event {
        Event {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            email: "test@test.com".into(),
            date: Utc.with_ymd_and_hms(2026, 1, day, 10, 0, 0).unwrap(),
            collection_id: collection_id.into(),
        }
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let app = router().with_state(state);
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_events_returns_envelope_oldest_first() {
        // Arrange
        let state = app_state_with(Arc::new(InMemoryEventRepository::new(vec![
            event("123", "UPDATED", 2),
            event("123", "CREATED", 1),
            event("456", "CREATED", 1),
        ])));

        // Act
        let (status, json) = get_json(state, "/collections/123/events").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 2);
        assert_eq!(json["total_count"], 2);
        assert_eq!(json["offset"], 0);
        assert_eq!(json["limit"], 20);
        assert_eq!(json["items"][0]["type"], "CREATED");
        assert_eq!(json["items"][0]["email"], "test@test.com");
        assert_eq!(json["items"][0]["date"], "2026-01-01T10:00:00Z");
        assert!(json["items"][0].get("collection_id").is_none());
    }

    #[tokio::test]
    async fn test_list_events_unknown_collection_is_empty_page() {
        // Arrange
        let state = app_state_with(Arc::new(InMemoryEventRepository::default()));

        // Act
        let (status, json) = get_json(state, "/collections/nope/events").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["items"], Value::Array(Vec::new()));
        assert_eq!(json["total_count"], 0);
    }

    #[tokio::test]
    async fn test_list_events_takes_first_of_repeated_parameters() {
        // Arrange
        let state = app_state_with(Arc::new(InMemoryEventRepository::new(vec![
            event("123", "CREATED", 1),
            event("123", "UPDATED", 2),
        ])));

        // Act
        let (status, json) = get_json(state, "/collections/123/events?limit=1&limit=abc").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["limit"], 1);
        assert_eq!(json["items"][0]["type"], "CREATED");
        assert_eq!(json["total_count"], 2);
    }

    #[tokio::test]
    async fn test_list_events_returns_400_for_bad_limit() {
        // Arrange
        let state = app_state_with(Arc::new(InMemoryEventRepository::default()));

        // Act
        let (status, json) = get_json(state, "/collections/123/events?limit=-5").await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["message"], "invalid limit query parameter");
    }

    #[tokio::test]
    async fn test_list_events_returns_500_when_repository_fails() {
        // Arrange
        let state = app_state_with(Arc::new(FailingEventRepository));

        // Act
        let (status, json) = get_json(state, "/collections/123/events").await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["errors"][0]["code"], "internal_error");
    }
}
