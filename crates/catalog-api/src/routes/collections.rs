//! Routes for creating, reading, replacing and listing collections.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use catalog_collections::application::query_handlers::{self, ListingView};
use catalog_collections::application::command_handlers;
use catalog_collections::domain::commands;
use catalog_core::collection::Collection;
use catalog_core::error::ValidationError;
use catalog_core::query::RawCollectionsQuery;

use super::{QueryPairs, query_pairs};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /collections and PUT /collections/{id}.
///
/// Unknown fields, including any `id`, are ignored.
#[derive(Debug, Deserialize)]
pub struct CollectionRequest {
    /// The collection name.
    #[serde(default)]
    pub name: String,
    /// When the collection is scheduled to be published.
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
}

fn if_match(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::IF_MATCH)
        .and_then(|value| value.to_str().ok())
}

fn parse_collection_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidId.into())
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        debug!(%rejection, "rejected request body");
        ValidationError::UnableToParseJson.into()
    })
}

fn with_etag(status: StatusCode, collection: Collection) -> Response {
    let etag = collection.etag.clone();
    (status, [(header::ETAG, etag)], Json(collection)).into_response()
}

/// GET /collections
#[instrument(skip(state))]
async fn list_collections(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<ListingView<Collection>>, ApiError> {
    let raw = RawCollectionsQuery::from_pairs(&query_pairs(query)?);
    let view =
        query_handlers::list_collections(&raw, &state.pagination, &*state.collections).await?;
    Ok(Json(view))
}

/// POST /collections
#[instrument(skip(state, body))]
async fn create_collection(
    State(state): State<AppState>,
    body: Result<Json<CollectionRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(body)?;
    let command = commands::CreateCollection {
        correlation_id: Uuid::new_v4(),
        name: request.name,
        publish_date: request.publish_date,
    };

    info!(correlation_id = %command.correlation_id, "handling create_collection command");

    let collection =
        command_handlers::handle_create_collection(&command, &*state.collections).await?;

    Ok(with_etag(StatusCode::CREATED, collection))
}

/// GET /collections/{collection_id}
#[instrument(skip(state, headers))]
async fn get_collection(
    State(state): State<AppState>,
    Path(collection_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let collection_id = parse_collection_id(&collection_id)?;
    let collection =
        query_handlers::get_collection(collection_id, if_match(&headers), &*state.collections)
            .await?;
    Ok(with_etag(StatusCode::OK, collection))
}

/// PUT /collections/{collection_id}
#[instrument(skip(state, headers, body))]
async fn replace_collection(
    State(state): State<AppState>,
    Path(collection_id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<CollectionRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let collection_id = parse_collection_id(&collection_id)?;
    let request = json_body(body)?;
    let command = commands::ReplaceCollection {
        correlation_id: Uuid::new_v4(),
        collection_id,
        name: request.name,
        publish_date: request.publish_date,
        if_match: if_match(&headers).map(str::to_owned),
    };

    info!(correlation_id = %command.correlation_id, "handling replace_collection command");

    let collection =
        command_handlers::handle_replace_collection(&command, &*state.collections).await?;

    Ok(with_etag(StatusCode::OK, collection))
}

/// Returns the router for the collection resources.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/collections",
            get(list_collections).post(create_collection),
        )
        .route(
            "/collections/{collection_id}",
            get(get_collection).put(replace_collection),
        )
}
