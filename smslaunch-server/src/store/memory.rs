//! In-memory storage implementations

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use smslaunch_core::{Contact, ContactDraft, ContactId};
use uuid::Uuid;

use super::{
    sort_newest_first, ContactStore, Session, SessionId, SessionStore, StoreResult, User, UserId,
    UserStore,
};
use crate::error::ApiError;

/// In-memory user store
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
    next_user_id: AtomicU64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_user_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for InMemoryUserStore {
    fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        let normalized = email.to_lowercase();
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == normalized) {
            return Err(ApiError::EmailAlreadyExists);
        }

        let id = UserId(self.next_user_id.fetch_add(1, Ordering::SeqCst));
        let user = User {
            id,
            email: normalized,
            password_hash: password_hash.to_string(),
            phone_number: None,
            created_at: Utc::now(),
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        Ok(self.users.read().unwrap().get(&user_id).cloned())
    }

    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let normalized = email.to_lowercase();
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == normalized).cloned())
    }

    fn update_phone_number(
        &self,
        user_id: UserId,
        phone_number: Option<&str>,
    ) -> StoreResult<User> {
        let mut users = self.users.write().unwrap();
        if let Some(user) = users.get_mut(&user_id) {
            user.phone_number = phone_number.map(str::to_string);
            Ok(user.clone())
        } else {
            Err(ApiError::UserNotFound)
        }
    }
}

/// In-memory session store
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Backdate a session's creation time (for testing expiry)
    pub fn set_created_at(
        &self,
        session_id: &SessionId,
        created_at: chrono::DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut sessions = self.sessions.write().unwrap();
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.created_at = created_at;
                Ok(())
            }
            None => Err(ApiError::NotAuthenticated),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, user_id: UserId) -> StoreResult<Session> {
        let session = Session {
            id: SessionId(Uuid::new_v4().to_string()),
            user_id,
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>> {
        Ok(self.sessions.read().unwrap().get(session_id).cloned())
    }

    fn delete(&self, session_id: &SessionId) -> StoreResult<()> {
        self.sessions.write().unwrap().remove(session_id);
        Ok(())
    }

    fn delete_expired(&self, ttl: chrono::Duration) -> StoreResult<u64> {
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(ttl));
        Ok((before - sessions.len()) as u64)
    }
}

/// Contact plus the user it belongs to
#[derive(Debug, Clone)]
struct OwnedContact {
    owner: UserId,
    contact: Contact,
}

/// In-memory contact store
pub struct InMemoryContactStore {
    contacts: RwLock<HashMap<ContactId, OwnedContact>>,
    next_contact_id: AtomicU64,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self {
            contacts: RwLock::new(HashMap::new()),
            next_contact_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryContactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactStore for InMemoryContactStore {
    fn list_contacts(&self, owner: UserId) -> StoreResult<Vec<Contact>> {
        let contacts = self.contacts.read().unwrap();
        let mut owned: Vec<Contact> = contacts
            .values()
            .filter(|c| c.owner == owner)
            .map(|c| c.contact.clone())
            .collect();
        sort_newest_first(&mut owned);
        Ok(owned)
    }

    fn create_contact(&self, owner: UserId, draft: &ContactDraft) -> StoreResult<Contact> {
        let id = ContactId(self.next_contact_id.fetch_add(1, Ordering::SeqCst));
        let contact = Contact {
            id,
            name: draft.name.clone(),
            number: draft.number.clone(),
            created_at: Utc::now(),
        };
        self.contacts.write().unwrap().insert(
            id,
            OwnedContact {
                owner,
                contact: contact.clone(),
            },
        );
        Ok(contact)
    }

    fn update_contact(
        &self,
        owner: UserId,
        id: ContactId,
        draft: &ContactDraft,
    ) -> StoreResult<Contact> {
        let mut contacts = self.contacts.write().unwrap();
        match contacts.get_mut(&id) {
            Some(record) if record.owner == owner => {
                record.contact.name = draft.name.clone();
                record.contact.number = draft.number.clone();
                Ok(record.contact.clone())
            }
            _ => Err(ApiError::ContactNotFound),
        }
    }

    fn delete_contact(&self, owner: UserId, id: ContactId) -> StoreResult<()> {
        let mut contacts = self.contacts.write().unwrap();
        match contacts.get(&id) {
            Some(record) if record.owner == owner => {
                contacts.remove(&id);
                Ok(())
            }
            _ => Err(ApiError::ContactNotFound),
        }
    }
}
