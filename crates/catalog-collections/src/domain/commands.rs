//! Commands for the collection catalog.

use catalog_core::command::Command;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Command to create a new collection.
#[derive(Debug, Clone)]
pub struct CreateCollection {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The unique collection name.
    pub name: String,
    /// When the collection is scheduled to be published, if known.
    pub publish_date: Option<DateTime<Utc>>,
}

impl Command for CreateCollection {
    fn command_type(&self) -> &'static str {
        "collections.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to replace an existing collection's mutable fields.
#[derive(Debug, Clone)]
pub struct ReplaceCollection {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The collection being replaced.
    pub collection_id: Uuid,
    /// The new name.
    pub name: String,
    /// The new publish date.
    pub publish_date: Option<DateTime<Utc>>,
    /// Raw `If-Match` header value, if the client sent one.
    pub if_match: Option<String>,
}

impl Command for ReplaceCollection {
    fn command_type(&self) -> &'static str {
        "collections.replace"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
