//! Data models for server storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Unique session identifier, handed to clients as the bearer token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// A user account
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    /// Stored lowercase
    pub email: String,
    pub password_hash: String,
    /// Sender number, normalized like contact numbers
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user session
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is older than `ttl`
    pub fn is_expired(&self, ttl: chrono::Duration) -> bool {
        Utc::now() - self.created_at > ttl
    }
}
