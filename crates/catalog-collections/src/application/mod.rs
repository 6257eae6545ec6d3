//! Application layer for the collection catalog.

pub mod command_handlers;
pub mod query_handlers;
