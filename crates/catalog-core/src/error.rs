//! Domain error types.
//!
//! Every failure the catalog can report is a [`DomainError`]. Callers at the
//! HTTP boundary switch over [`DomainError::kind`] rather than comparing error
//! values, so adding a new cause never changes how existing ones are mapped.

use thiserror::Error;
use uuid::Uuid;

/// The closed set of error categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range client input. Never retried.
    Validation,
    /// The referenced collection does not exist.
    NotFound,
    /// Name uniqueness violation or stale ETag precondition.
    Conflict,
    /// Store I/O failure, serialization failure or anything unexpected.
    Internal,
}

impl ErrorKind {
    /// Machine-readable code used in error response bodies.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal_error",
        }
    }
}

/// Rejected client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `offset` is not a non-negative integer.
    #[error("invalid offset query parameter")]
    InvalidOffsetParameter,

    /// `limit` is not a non-negative integer.
    #[error("invalid limit query parameter")]
    InvalidLimitParameter,

    /// `limit` exceeds the configured maximum.
    #[error("limit query parameter is larger than the maximum allowed")]
    LimitOverMax,

    /// `order_by` is not one of the supported values.
    #[error("invalid order_by")]
    InvalidOrderBy,

    /// `name` search text is longer than 64 characters.
    #[error("name search text is >64 chars")]
    NameSearchTooLong,

    /// A collection name was empty.
    #[error("the collection name field must be specified")]
    CollectionNameEmpty,

    /// A collection id was empty.
    #[error("the collection id field must be specified")]
    CollectionIdEmpty,

    /// A collection id was not a UUID.
    #[error("collection id must be valid UUID")]
    InvalidId,

    /// A replace request arrived without an `If-Match` header.
    #[error("required If-Match header not provided")]
    NoIfMatchHeader,

    /// The request body was not valid JSON for the expected shape.
    #[error("failed to parse json body")]
    UnableToParseJson,

    /// The query string could not be decoded.
    #[error("failed to parse query string")]
    UnableToParseQuery,
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Client input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No collection exists with the given id.
    #[error("collection not found: {0}")]
    CollectionNotFound(Uuid),

    /// No collection exists with the given name.
    #[error("collection not found: {0}")]
    CollectionNameNotFound(String),

    /// Another collection already uses this name.
    #[error("a collection with this name already exists: {0}")]
    CollectionNameAlreadyExists(String),

    /// The stored ETag does not match the caller's precondition.
    #[error("out of date collection resource: {collection_id}")]
    ETagMismatch {
        /// The collection whose ETag did not match.
        collection_id: Uuid,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Classifies this error into the closed [`ErrorKind`] taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::CollectionNotFound(_) | Self::CollectionNameNotFound(_) => ErrorKind::NotFound,
            Self::CollectionNameAlreadyExists(_) | Self::ETagMismatch { .. } => {
                ErrorKind::Conflict
            }
            Self::Infrastructure(_) => ErrorKind::Internal,
        }
    }

    /// Returns `true` when the error means the document does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
