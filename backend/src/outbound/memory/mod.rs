//! Process-local `UserRepository` implementation.
//!
//! Used when the server starts without a database URL and by HTTP tests.
//! Mirrors the PostgreSQL table: identifiers are assigned from a counter that
//! never reuses values and emails are unique across records. Contents are
//! lost when the process exits.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserDraft, UserId};

#[derive(Debug)]
struct Table {
    next_id: i32,
    rows: BTreeMap<UserId, User>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.rows
            .values()
            .any(|user| user.email().as_ref() == email && Some(user.id()) != except)
    }

    fn allocate_id(&mut self) -> Result<UserId, UserPersistenceError> {
        let id = UserId::new(self.next_id)
            .map_err(|err| UserPersistenceError::query(format!("identifier allocation: {err}")))?;
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| UserPersistenceError::query("identifier sequence exhausted"))?;
        Ok(id)
    }
}

/// In-memory user table guarded by a mutex.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, UserPersistenceError> {
        self.table
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory user table lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn insert(&self, draft: &UserDraft) -> Result<User, UserPersistenceError> {
        let mut table = self.lock()?;
        if table.email_taken(draft.email().as_ref(), None) {
            return Err(UserPersistenceError::duplicate_email(draft.email().as_ref()));
        }
        let id = table.allocate_id()?;
        let user = User::from_draft(id, draft.clone());
        table.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        id: UserId,
        draft: &UserDraft,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut table = self.lock()?;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        if table.email_taken(draft.email().as_ref(), Some(id)) {
            return Err(UserPersistenceError::duplicate_email(draft.email().as_ref()));
        }
        let user = User::from_draft(id, draft.clone());
        table.rows.insert(id, user.clone());
        Ok(Some(user))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }
}
