//! The collection document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, publishable grouping of statistical content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Immutable identifier.
    pub id: Uuid,
    /// Unique, non-empty display name.
    pub name: String,
    /// When the collection is scheduled to publish, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
    /// Server-assigned on first insert; `None` until the collection is stored.
    #[serde(skip)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Fingerprint of the fields above (excluding `last_updated`).
    #[serde(rename = "e_tag", default, skip_serializing_if = "String::is_empty")]
    pub etag: String,
}

impl Collection {
    /// Builds an unstored collection with no ETag yet.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>, publish_date: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            name: name.into(),
            publish_date,
            last_updated: None,
            etag: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_serializes_with_wire_field_names() {
        let id = Uuid::new_v4();
        let mut collection = Collection::new(
            id,
            "Coronavirus key indicators",
            Some(Utc.with_ymd_and_hms(2020, 5, 5, 14, 58, 29).unwrap()),
        );
        collection.etag = "abc".to_owned();
        collection.last_updated = Some(Utc::now());

        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["name"], "Coronavirus key indicators");
        assert_eq!(json["publish_date"], "2020-05-05T14:58:29Z");
        assert_eq!(json["e_tag"], "abc");
        assert!(json.get("last_updated").is_none());
    }

    #[test]
    fn test_omits_empty_optional_fields() {
        let collection = Collection::new(Uuid::new_v4(), "LMSV3", None);

        let json = serde_json::to_value(&collection).unwrap();

        assert!(json.get("publish_date").is_none());
        assert!(json.get("e_tag").is_none());
    }
}
