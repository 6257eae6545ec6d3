//! Command handlers for the collection catalog.
//!
//! Each handler checks the caller-side preconditions (name present and
//! unique, `If-Match` supplied) and then delegates to the repository.

use catalog_core::collection::Collection;
use catalog_core::command::Command;
use catalog_core::error::{DomainError, ValidationError};
use catalog_core::repository::{CollectionRepository, ETagSelector};
use tracing::debug;
use uuid::Uuid;

use crate::domain::commands::{CreateCollection, ReplaceCollection};

/// Fails unless `name` is free, or held by `owner` itself.
async fn ensure_name_available(
    repo: &dyn CollectionRepository,
    name: &str,
    owner: Option<Uuid>,
) -> Result<(), DomainError> {
    match repo.get_by_name(name).await {
        Ok(existing) if Some(existing.id) == owner => Ok(()),
        Ok(_) => Err(DomainError::CollectionNameAlreadyExists(name.to_owned())),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Handles the `CreateCollection` command: validates the name, assigns a new
/// id and the creation ETag, and stores the collection.
///
/// # Errors
///
/// Returns `ValidationError::CollectionNameEmpty` for an empty name,
/// `DomainError::CollectionNameAlreadyExists` if the name is taken, and any
/// repository error otherwise.
pub async fn handle_create_collection(
    command: &CreateCollection,
    repo: &dyn CollectionRepository,
) -> Result<Collection, DomainError> {
    if command.name.is_empty() {
        return Err(ValidationError::CollectionNameEmpty.into());
    }
    ensure_name_available(repo, &command.name, None).await?;

    let mut collection =
        Collection::new(Uuid::new_v4(), command.name.clone(), command.publish_date);
    collection.etag = collection.creation_fingerprint()?;

    repo.add(&collection).await?;

    debug!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        collection_id = %collection.id,
        "collection created"
    );
    Ok(collection)
}

/// Handles the `ReplaceCollection` command: requires an `If-Match` value and
/// replaces the collection only if its current ETag still matches.
///
/// # Errors
///
/// Returns `ValidationError::NoIfMatchHeader` when no `If-Match` value was
/// supplied, `ValidationError::CollectionNameEmpty` for an empty name,
/// `DomainError::CollectionNameAlreadyExists` if another collection holds the
/// name, `DomainError::CollectionNotFound` for an unknown id and
/// `DomainError::ETagMismatch` when the ETag is stale.
pub async fn handle_replace_collection(
    command: &ReplaceCollection,
    repo: &dyn CollectionRepository,
) -> Result<Collection, DomainError> {
    let if_match = command
        .if_match
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ValidationError::NoIfMatchHeader)?;
    if command.name.is_empty() {
        return Err(ValidationError::CollectionNameEmpty.into());
    }
    ensure_name_available(repo, &command.name, Some(command.collection_id)).await?;

    let update = Collection::new(
        command.collection_id,
        command.name.clone(),
        command.publish_date,
    );
    let replaced = repo
        .replace_collection(&update, &ETagSelector::parse(if_match))
        .await?;

    debug!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        collection_id = %replaced.id,
        "collection replaced"
    );
    Ok(replaced)
}
