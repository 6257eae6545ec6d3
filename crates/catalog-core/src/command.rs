//! Command abstractions.

use uuid::Uuid;

/// A write request against the catalog.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name for logging, e.g. `collections.create`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID tying log lines for one request together.
    fn correlation_id(&self) -> Uuid;
}
