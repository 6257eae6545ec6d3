//! PostgreSQL-backed repositories for the collection catalog.
//!
//! Schema lives in the workspace `migrations/` directory; [`MIGRATOR`] embeds
//! it so the server and tests apply the same migrations.

mod error;
pub mod pg_collection_repository;
pub mod pg_event_repository;

pub use pg_collection_repository::PgCollectionRepository;
pub use pg_event_repository::PgEventRepository;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
