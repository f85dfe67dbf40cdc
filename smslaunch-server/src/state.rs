//! Shared application state

use std::sync::Arc;

use crate::crypto::BCRYPT_COST;
use crate::store::{ContactStore, SessionStore, UserStore};

/// Server application state
pub struct AppState<U, S, C> {
    pub user_store: Arc<U>,
    pub session_store: Arc<S>,
    pub contact_store: Arc<C>,
    /// Sessions older than this are rejected and removed
    pub session_ttl: chrono::Duration,
    /// bcrypt cost for new password hashes
    pub password_cost: u32,
}

impl<U, S, C> AppState<U, S, C>
where
    U: UserStore,
    S: SessionStore,
    C: ContactStore,
{
    pub fn new(user_store: U, session_store: S, contact_store: C) -> Self {
        Self {
            user_store: Arc::new(user_store),
            session_store: Arc::new(session_store),
            contact_store: Arc::new(contact_store),
            session_ttl: chrono::Duration::days(7),
            password_cost: BCRYPT_COST,
        }
    }

    pub fn with_session_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }
}
