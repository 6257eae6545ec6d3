//! Collection catalog HTTP API.
//!
//! Exposes the library half of the `catalog-api` binary so integration tests
//! can build the same router against in-memory repositories.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
