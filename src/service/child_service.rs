//! Child service: creating, editing and removing the children events hang
//! off.

use std::sync::Arc;

use crate::domain::{Child, ChildId, ChildProfile, NewChild};
use crate::error::GatewayError;
use crate::persistence::ChildStore;

/// CRUD over children.
#[derive(Debug, Clone)]
pub struct ChildService {
    store: Arc<dyn ChildStore>,
}

impl ChildService {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ChildStore>) -> Self {
        Self { store }
    }

    /// Children created by `owner`, or every child when `owner` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on storage failure.
    pub async fn list(&self, owner: Option<uuid::Uuid>) -> Result<Vec<Child>, GatewayError> {
        Ok(self.store.list_children(owner).await?)
    }

    /// Stores a new child. A birth date in the future is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the name or gender is
    /// blank, or [`GatewayError::Store`] on storage failure.
    pub async fn create(
        &self,
        owner_id: Option<uuid::Uuid>,
        profile: ChildProfile,
    ) -> Result<Child, GatewayError> {
        let child = self
            .store
            .insert_child(NewChild {
                id: ChildId::new(),
                owner_id,
                profile: profile.normalized()?,
            })
            .await?;
        tracing::info!(child_id = %child.id, "child created");
        Ok(child)
    }

    /// Returns the child under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChildNotFound`] if no such child exists, or
    /// [`GatewayError::Store`] on storage failure.
    pub async fn get(&self, id: ChildId) -> Result<Child, GatewayError> {
        self.store
            .get_child(id)
            .await?
            .ok_or(GatewayError::ChildNotFound(id))
    }

    /// Replaces every editable field of the child under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on a blank field,
    /// [`GatewayError::ChildNotFound`] if the child does not exist, or
    /// [`GatewayError::Store`] on storage failure.
    pub async fn update(&self, id: ChildId, profile: ChildProfile) -> Result<Child, GatewayError> {
        let child = self
            .store
            .update_child(id, profile.normalized()?)
            .await?
            .ok_or(GatewayError::ChildNotFound(id))?;
        tracing::info!(child_id = %id, "child updated");
        Ok(child)
    }

    /// Deletes the child under `id` with all of its events and photos.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ChildNotFound`] if no such child exists, or
    /// [`GatewayError::Store`] on storage failure.
    pub async fn delete(&self, id: ChildId) -> Result<(), GatewayError> {
        if !self.store.delete_child(id).await? {
            return Err(GatewayError::ChildNotFound(id));
        }
        tracing::info!(child_id = %id, "child deleted");
        Ok(())
    }
}
