//! Shared test doubles for the collection catalog.

mod clock;
mod repository;

pub use clock::FixedClock;
pub use repository::{
    FailingCollectionRepository, FailingEventRepository, InMemoryCollectionRepository,
    InMemoryEventRepository,
};
