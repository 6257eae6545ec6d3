//! HTTP routes.

use axum::Router;
use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use catalog_core::error::ValidationError;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

pub mod collections;
pub mod events;
pub mod health;

/// Decoded query-string pairs in request order. Repeated keys are kept so
/// callers can take the first occurrence.
type QueryPairs = Vec<(String, String)>;

fn query_pairs(
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<QueryPairs, ApiError> {
    query.map(|Query(pairs)| pairs).map_err(|rejection| {
        debug!(%rejection, "rejected query string");
        ValidationError::UnableToParseQuery.into()
    })
}

/// Returns the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(collections::router())
        .merge(events::router())
}
