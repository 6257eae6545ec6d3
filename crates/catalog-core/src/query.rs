//! Query parameter resolution.
//!
//! Turns untrusted listing parameters into bounded, validated descriptors.
//! Nothing here touches the store; every function is a pure check.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest accepted `name` search text, in characters.
pub const MAX_NAME_SEARCH_CHARS: usize = 64;

/// Pagination defaults and bounds, supplied by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Offset used when the request omits one.
    pub default_offset: u32,
    /// Limit used when the request omits one.
    pub default_limit: u32,
    /// Largest limit a request may ask for.
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_offset: 0,
            default_limit: 20,
            max_limit: 1000,
        }
    }
}

impl PaginationConfig {
    /// Checks that the defaults fit inside the bounds.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if `default_limit > max_limit`.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_limit > self.max_limit {
            return Err(format!(
                "default limit {} exceeds maximum limit {}",
                self.default_limit, self.max_limit
            ));
        }
        Ok(())
    }
}

/// Sort order for collection listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    /// Insertion order.
    #[default]
    Default,
    /// `publish_date` ascending.
    PublishDate,
}

impl OrderBy {
    /// Parses an `order_by` value, ignoring case. Empty means [`OrderBy::Default`].
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidOrderBy` for any other value.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            Ok(Self::Default)
        } else if input.eq_ignore_ascii_case("publish_date") {
            Ok(Self::PublishDate)
        } else {
            Err(ValidationError::InvalidOrderBy)
        }
    }

    /// The wire name of this ordering.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PublishDate => "publish_date",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw `offset`/`limit` as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPagination {
    /// Requested offset.
    pub offset: Option<String>,
    /// Requested limit.
    pub limit: Option<String>,
}

/// Raw collection listing parameters as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCollectionsQuery {
    /// Requested offset.
    pub offset: Option<String>,
    /// Requested limit.
    pub limit: Option<String>,
    /// Requested ordering.
    pub order_by: Option<String>,
    /// Case-insensitive substring to match against collection names.
    pub name: Option<String>,
}

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

impl RawPagination {
    /// Builds from decoded query-string pairs. A repeated key keeps its first
    /// value; unknown keys are ignored.
    #[must_use]
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            offset: first_value(pairs, "offset"),
            limit: first_value(pairs, "limit"),
        }
    }
}

impl RawCollectionsQuery {
    /// Builds from decoded query-string pairs. A repeated key keeps its first
    /// value; unknown keys are ignored.
    #[must_use]
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            offset: first_value(pairs, "offset"),
            limit: first_value(pairs, "limit"),
            order_by: first_value(pairs, "order_by"),
            name: first_value(pairs, "name"),
        }
    }
}

/// A validated offset/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Items to skip.
    pub offset: u32,
    /// Maximum items to return; zero returns only the total count.
    pub limit: u32,
}

/// Validated parameters for listing collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDescriptor {
    /// Items to skip.
    pub offset: u32,
    /// Maximum items to return.
    pub limit: u32,
    /// Sort order.
    pub order_by: OrderBy,
    /// Name filter; empty matches everything.
    pub name_search: String,
}

/// Validated parameters for listing one collection's events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventsQueryDescriptor {
    /// The collection whose events to list. Never empty.
    pub collection_id: String,
    /// Items to skip.
    pub offset: u32,
    /// Maximum items to return.
    pub limit: u32,
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.is_empty())
}

fn parse_non_negative(raw: &str, error: ValidationError) -> Result<i64, ValidationError> {
    match raw.parse::<i64>() {
        Ok(value) if value >= 0 => Ok(value),
        _ => Err(error),
    }
}

/// Resolves `offset` and `limit`, applying defaults and the maximum.
///
/// # Errors
///
/// Returns `InvalidOffsetParameter` or `InvalidLimitParameter` for values that
/// are not non-negative integers, and `LimitOverMax` when the limit exceeds
/// `config.max_limit`.
pub fn resolve_pagination(
    raw: &RawPagination,
    config: &PaginationConfig,
) -> Result<Pagination, ValidationError> {
    let offset = match present(raw.offset.as_deref()) {
        Some(value) => {
            let parsed = parse_non_negative(value, ValidationError::InvalidOffsetParameter)?;
            u32::try_from(parsed).map_err(|_| ValidationError::InvalidOffsetParameter)?
        }
        None => config.default_offset,
    };

    let limit = match present(raw.limit.as_deref()) {
        Some(value) => parse_non_negative(value, ValidationError::InvalidLimitParameter)?,
        None => i64::from(config.default_limit),
    };

    if limit > i64::from(config.max_limit) {
        return Err(ValidationError::LimitOverMax);
    }
    let limit = u32::try_from(limit).map_err(|_| ValidationError::LimitOverMax)?;

    Ok(Pagination { offset, limit })
}

/// Checks a `name` search term.
///
/// # Errors
///
/// Returns `NameSearchTooLong` above [`MAX_NAME_SEARCH_CHARS`] characters.
pub fn validate_name_search(input: &str) -> Result<(), ValidationError> {
    if input.chars().count() > MAX_NAME_SEARCH_CHARS {
        return Err(ValidationError::NameSearchTooLong);
    }
    Ok(())
}

/// Resolves collection listing parameters.
///
/// # Errors
///
/// Returns the first `ValidationError` found, checking offset, limit,
/// `order_by` and `name` in that order.
pub fn resolve_collections_query(
    raw: &RawCollectionsQuery,
    config: &PaginationConfig,
) -> Result<QueryDescriptor, ValidationError> {
    let pagination = resolve_pagination(
        &RawPagination {
            offset: raw.offset.clone(),
            limit: raw.limit.clone(),
        },
        config,
    )?;

    let order_by = OrderBy::parse(raw.order_by.as_deref().unwrap_or_default())?;

    let name_search = raw.name.clone().unwrap_or_default();
    validate_name_search(&name_search)?;

    Ok(QueryDescriptor {
        offset: pagination.offset,
        limit: pagination.limit,
        order_by,
        name_search,
    })
}

/// Resolves event listing parameters for one collection.
///
/// # Errors
///
/// Returns `CollectionIdEmpty` for an empty id, otherwise any pagination error.
pub fn resolve_events_query(
    collection_id: &str,
    raw: &RawPagination,
    config: &PaginationConfig,
) -> Result<EventsQueryDescriptor, ValidationError> {
    let pagination = resolve_pagination(raw, config)?;

    if collection_id.is_empty() {
        return Err(ValidationError::CollectionIdEmpty);
    }

    Ok(EventsQueryDescriptor {
        collection_id: collection_id.to_owned(),
        offset: pagination.offset,
        limit: pagination.limit,
    })
}
