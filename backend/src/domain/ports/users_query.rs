//! Driving port for reading users.
//!
//! HTTP handlers depend on this trait rather than on a repository, keeping
//! persistence concerns behind the domain boundary.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Read-side use cases.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return every user in insertion order.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// Return one user, failing with [`crate::domain::ErrorCode::NotFound`]
    /// when the identifier is unknown.
    async fn find_user(&self, id: UserId) -> Result<User, Error>;
}
