//! Driving port for creating, editing and deleting users.

use async_trait::async_trait;

use crate::domain::{Error, User, UserDraft, UserId};

/// Write-side use cases.
///
/// Unknown identifiers fail with [`crate::domain::ErrorCode::NotFound`] and
/// a taken email with [`crate::domain::ErrorCode::Conflict`].
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Persist a new user.
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Overwrite the name and email of an existing user.
    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<User, Error>;

    /// Permanently remove a user.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;
}
