//! User directory service.
//!
//! Implements the driving ports over a [`UserRepository`], turning missing
//! records into not-found errors and persistence failures into domain
//! errors the HTTP adapter can render.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{Error, User, UserDraft, UserField, UserId};

/// Use-case service backing [`UsersQuery`] and [`UsersCommand`].
#[derive(Clone)]
pub struct UserDirectoryService<R> {
    repository: Arc<R>,
}

impl<R> UserDirectoryService<R> {
    /// Create a service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} does not exist")).with_details(json!({ "id": id.get() }))
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository unavailable");
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("a user with email {email} already exists"))
                .with_details(json!({ "field": UserField::Email.as_str() }))
        }
    }
}

#[async_trait]
impl<R> UsersQuery for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repository.list().await.map_err(map_persistence_error)
    }

    async fn find_user(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl<R> UsersCommand for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        let user = self
            .repository
            .insert(&draft)
            .await
            .map_err(map_persistence_error)?;
        info!(user_id = %user.id(), "user created");
        Ok(user)
    }

    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<User, Error> {
        let user = self
            .repository
            .update(id, &draft)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| user_not_found(id))?;
        info!(user_id = %id, "user updated");
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(map_persistence_error)?;
        if !removed {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
