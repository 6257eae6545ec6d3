//! Audit events recorded against a collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable audit record emitted by an external process.
///
/// The catalog only reads events; it never creates, mutates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Server-generated identifier. Not exposed on the wire.
    #[serde(skip_serializing, default = "Uuid::nil")]
    pub id: Uuid,
    /// What happened, e.g. `CREATED`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Who did it.
    pub email: String,
    /// When it happened.
    pub date: DateTime<Utc>,
    /// The collection this event belongs to. Advisory only; not enforced.
    #[serde(skip_serializing, default)]
    pub collection_id: String,
}
