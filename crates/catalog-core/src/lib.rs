//! Shared domain types and abstractions for the collection catalog.
//!
//! Defines the collection and event documents, the fingerprint used as an
//! ETag, query parameter resolution and the repository traits the store and
//! API crates meet at. It contains no infrastructure code.

pub mod clock;
pub mod collection;
pub mod command;
pub mod error;
pub mod event;
pub mod fingerprint;
pub mod query;
pub mod repository;
