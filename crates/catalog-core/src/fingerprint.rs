//! Content fingerprints ("ETags") for collections.
//!
//! A fingerprint is the SHA-256 digest of a canonical encoding of the
//! collection's identifying fields, truncated to 160 bits and hex-encoded.
//! The `etag` field itself and the server-assigned `last_updated` are never
//! part of the input, so re-hashing a stored collection reproduces its ETag.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::collection::Collection;
use crate::error::DomainError;

/// Number of digest bytes kept; 20 bytes encode to 40 hex characters.
pub const FINGERPRINT_BYTES: usize = 20;

/// Canonical, field-ordered view of the hashed fields.
#[derive(Serialize)]
struct HashedFields<'a> {
    id: &'a Uuid,
    name: &'a str,
    publish_date: Option<&'a DateTime<Utc>>,
}

impl<'a> From<&'a Collection> for HashedFields<'a> {
    fn from(collection: &'a Collection) -> Self {
        Self {
            id: &collection.id,
            name: &collection.name,
            publish_date: collection.publish_date.as_ref(),
        }
    }
}

fn canonical_bytes(collection: &Collection) -> Result<Vec<u8>, DomainError> {
    serde_json::to_vec(&HashedFields::from(collection))
        .map_err(|e| DomainError::Infrastructure(format!("fingerprint serialization failed: {e}")))
}

impl Collection {
    /// Hashes this collection followed by `extra_bytes`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the canonical encoding fails.
    pub fn fingerprint(&self, extra_bytes: &[u8]) -> Result<String, DomainError> {
        let mut bytes = canonical_bytes(self)?;
        bytes.extend_from_slice(extra_bytes);

        let digest = Sha256::digest(&bytes);
        Ok(hex::encode(&digest[..FINGERPRINT_BYTES]))
    }

    /// The ETag a new collection is stored with.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the canonical encoding fails.
    pub fn creation_fingerprint(&self) -> Result<String, DomainError> {
        self.fingerprint(&[])
    }

    /// The ETag after applying `update` to this (currently stored) collection.
    ///
    /// Combines the prior state with the delta so the result differs from the
    /// current ETag even when `update` repeats the stored values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the canonical encoding fails.
    pub fn fingerprint_for_update(&self, update: &Collection) -> Result<String, DomainError> {
        self.fingerprint(&canonical_bytes(update)?)
    }
}
