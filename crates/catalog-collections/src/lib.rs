//! Collection catalog application layer.
//!
//! Creates and replaces collections under optimistic concurrency and serves
//! the paginated collection and audit-event listings.

pub mod application;
pub mod domain;
