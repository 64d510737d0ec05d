//! Generic authorized CRUD over one resource type.
//!
//! Every operation follows the same order: authorize, validate, touch the
//! store, then (for writes) mark dependent pages stale. An operation that fails
//! authorization or validation never reaches the store.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::{Role, Session, authorize},
    error::AppError,
    models::Review,
    repository::StoreState,
    resources::{Mutation, Resource, Scope, Validate},
    revalidate::RevalidatorState,
};

pub struct CrudService<R: Resource> {
    store: StoreState<R>,
    revalidator: RevalidatorState,
}

impl<R: Resource> Clone for CrudService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            revalidator: Arc::clone(&self.revalidator),
        }
    }
}

impl<R: Resource> CrudService<R> {
    pub fn new(store: StoreState<R>, revalidator: RevalidatorState) -> Self {
        Self { store, revalidator }
    }

    /// Lists rows newest first. The `All` scope is admin-only.
    pub async fn list(&self, actor: Option<&Session>, scope: Scope) -> Result<Vec<R>, AppError> {
        if scope == Scope::All {
            authorize(actor, Role::Admin)?;
        }
        self.store
            .list(scope)
            .await
            .map_err(|e| AppError::from_store(R::KIND, e))
    }

    /// Public detail lookup. Rows hidden from the public scope are reported as
    /// not found.
    pub async fn get(&self, key: &str) -> Result<R, AppError> {
        self.store
            .find_public(key)
            .await
            .map_err(|e| AppError::from_store(R::KIND, e))
    }

    pub async fn create(&self, actor: Option<&Session>, draft: R::Draft) -> Result<R, AppError> {
        if let Some(required) = R::CREATE_ROLE {
            authorize(actor, required)?;
        }
        draft.validate()?;

        let record = R::from_draft(draft, Uuid::new_v4(), Utc::now());
        let created = self
            .store
            .insert(record)
            .await
            .map_err(|e| AppError::from_store(R::KIND, e))?;

        tracing::info!(kind = R::KIND, id = %created.id(), "created");
        self.invalidate(created.stale_paths(Mutation::Created)).await;
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: Option<&Session>,
        id: Uuid,
        changes: R::Changes,
    ) -> Result<R, AppError> {
        authorize(actor, Role::Admin)?;
        changes.validate()?;

        let previous = self
            .store
            .find(id)
            .await
            .map_err(|e| AppError::from_store(R::KIND, e))?;
        let updated = self
            .store
            .update(id, changes, Utc::now())
            .await
            .map_err(|e| AppError::from_store(R::KIND, e))?;

        tracing::info!(kind = R::KIND, %id, "updated");
        let mut paths = updated.stale_paths(Mutation::Updated);
        let previous_key = previous.public_key();
        if previous_key != updated.public_key() {
            // The page at the old address still renders the record.
            paths.push(R::detail_path(&previous_key));
        }
        self.invalidate(paths).await;
        Ok(updated)
    }

    /// Hard delete. Deleting an id that no longer exists is `NotFound`.
    pub async fn delete(&self, actor: Option<&Session>, id: Uuid) -> Result<R, AppError> {
        authorize(actor, Role::Admin)?;

        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(|e| AppError::from_store(R::KIND, e))?;

        tracing::info!(kind = R::KIND, %id, "deleted");
        self.invalidate(deleted.stale_paths(Mutation::Deleted)).await;
        Ok(deleted)
    }

    /// The write is already committed here, so a failing webhook is only
    /// logged; the pages regenerate on their next natural expiry.
    async fn invalidate(&self, paths: Vec<String>) {
        if paths.is_empty() {
            return;
        }
        if let Err(e) = self.revalidator.revalidate(&paths).await {
            tracing::warn!(kind = R::KIND, ?paths, error = %e, "page revalidation failed");
        }
    }
}

impl CrudService<Review> {
    /// Moves a review between the approved and unapproved states.
    pub async fn moderate(
        &self,
        actor: Option<&Session>,
        id: Uuid,
        approved: bool,
    ) -> Result<Review, AppError> {
        let changes = crate::models::ReviewChanges {
            approved: Some(approved),
        };
        self.update(actor, id, changes).await
    }
}
