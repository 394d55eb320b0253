//! Driven port for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{User, UserDraft, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The unique email constraint rejected an insert or update.
        DuplicateEmail { email: String } => "a user with email {email} already exists",
    }
}

/// Storage for user records.
///
/// Implementations own identifier assignment and must reject a second record
/// with an email already in use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return every stored user ordered by identifier.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Store a new user and return it with its assigned identifier.
    async fn insert(&self, draft: &UserDraft) -> Result<User, UserPersistenceError>;

    /// Overwrite name and email of an existing user.
    ///
    /// Returns `Ok(None)` when no user has the identifier.
    async fn update(
        &self,
        id: UserId,
        draft: &UserDraft,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove a user. Returns `false` when no user has the identifier.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;
}
