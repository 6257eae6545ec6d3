//! Domain layer for the collection catalog.

pub mod commands;
