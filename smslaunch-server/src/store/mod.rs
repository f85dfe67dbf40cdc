//! Storage abstractions for the server

pub mod memory;
pub mod models;
pub mod sqlite;

pub use memory::{InMemoryContactStore, InMemorySessionStore, InMemoryUserStore};
pub use models::*;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use smslaunch_core::{Contact, ContactDraft, ContactId};

use crate::error::ApiError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, ApiError>;

/// Trait for user account storage
pub trait UserStore: Send + Sync {
    /// Create a new user. Fails with `EmailAlreadyExists` on a taken email.
    fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User>;

    /// Get a user by ID
    fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>>;

    /// Get a user by email address (case-insensitive)
    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Set or clear the user's sender number
    fn update_phone_number(&self, user_id: UserId, phone_number: Option<&str>)
        -> StoreResult<User>;
}

/// Trait for session storage
pub trait SessionStore: Send + Sync {
    /// Create a new session for a user
    fn create(&self, user_id: UserId) -> StoreResult<Session>;

    /// Get a session by ID
    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>>;

    /// Delete a session
    fn delete(&self, session_id: &SessionId) -> StoreResult<()>;

    /// Delete sessions older than `ttl`, returning how many were removed
    fn delete_expired(&self, ttl: chrono::Duration) -> StoreResult<u64>;
}

/// Trait for contact storage.
///
/// Every operation is scoped to an owner; a contact owned by someone else
/// behaves exactly like one that does not exist.
pub trait ContactStore: Send + Sync {
    /// Owner's contacts, newest first
    fn list_contacts(&self, owner: UserId) -> StoreResult<Vec<Contact>>;

    /// Store a validated contact
    fn create_contact(&self, owner: UserId, draft: &ContactDraft) -> StoreResult<Contact>;

    /// Replace name and number, keeping id and creation time
    fn update_contact(
        &self,
        owner: UserId,
        id: ContactId,
        draft: &ContactDraft,
    ) -> StoreResult<Contact>;

    /// Remove a contact
    fn delete_contact(&self, owner: UserId, id: ContactId) -> StoreResult<()>;
}

/// Allow sharing one store across several roles (e.g. `Arc<SqliteStore>`)
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        (**self).create_user(email, password_hash)
    }

    fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        (**self).get_user(user_id)
    }

    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        (**self).get_user_by_email(email)
    }

    fn update_phone_number(
        &self,
        user_id: UserId,
        phone_number: Option<&str>,
    ) -> StoreResult<User> {
        (**self).update_phone_number(user_id, phone_number)
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn create(&self, user_id: UserId) -> StoreResult<Session> {
        (**self).create(user_id)
    }

    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>> {
        (**self).get(session_id)
    }

    fn delete(&self, session_id: &SessionId) -> StoreResult<()> {
        (**self).delete(session_id)
    }

    fn delete_expired(&self, ttl: chrono::Duration) -> StoreResult<u64> {
        (**self).delete_expired(ttl)
    }
}

impl<T: ContactStore + ?Sized> ContactStore for Arc<T> {
    fn list_contacts(&self, owner: UserId) -> StoreResult<Vec<Contact>> {
        (**self).list_contacts(owner)
    }

    fn create_contact(&self, owner: UserId, draft: &ContactDraft) -> StoreResult<Contact> {
        (**self).create_contact(owner, draft)
    }

    fn update_contact(
        &self,
        owner: UserId,
        id: ContactId,
        draft: &ContactDraft,
    ) -> StoreResult<Contact> {
        (**self).update_contact(owner, id, draft)
    }

    fn delete_contact(&self, owner: UserId, id: ContactId) -> StoreResult<()> {
        (**self).delete_contact(owner, id)
    }
}

/// Newest first, ties broken by id so equal timestamps keep a stable order
pub(crate) fn sort_newest_first(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
