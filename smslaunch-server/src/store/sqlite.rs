//! SQLite-based storage implementation

use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use smslaunch_core::{Contact, ContactDraft, ContactId};
use uuid::Uuid;

use super::{
    ContactStore, Session, SessionId, SessionStore, StoreResult, User, UserId, UserStore,
};
use crate::error::ApiError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQLite-based store implementing UserStore, SessionStore and ContactStore
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: &str) -> Result<Self, ApiError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Fresh private in-memory database
    pub fn open_in_memory() -> Result<Self, ApiError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, ApiError> {
        // Enable foreign keys
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        // Run migrations
        Self::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Current schema version (0 if no schema exists)
    pub fn schema_version(&self) -> Result<i32, ApiError> {
        let conn = self.conn.lock().unwrap();
        Self::get_schema_version(&conn)
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), ApiError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    fn get_schema_version(conn: &Connection) -> Result<i32, ApiError> {
        let table_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })?;
        Ok(version)
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), ApiError> {
        conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Users table
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                phone_number TEXT,
                created_at TEXT NOT NULL
            );

            -- Sessions (bearer tokens)
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL
            );

            -- Contacts (many per user)
            CREATE TABLE IF NOT EXISTS contacts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                number TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_contacts_user_created
                ON contacts(user_id, created_at DESC);
            "#,
        )?;

        Ok(())
    }
}

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let id: i64 = row.get(0)?;
    let created_at: String = row.get(4)?;
    Ok(User {
        id: UserId(id as u64),
        email: row.get(1)?,
        password_hash: row.get(2)?,
        phone_number: row.get(3)?,
        created_at: parse_timestamp(&created_at),
    })
}

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    let id: i64 = row.get(0)?;
    let created_at: String = row.get(3)?;
    Ok(Contact {
        id: ContactId(id as u64),
        name: row.get(1)?,
        number: row.get(2)?,
        created_at: parse_timestamp(&created_at),
    })
}

impl UserStore for SqliteStore {
    fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        let normalized = email.to_lowercase();
        let now = Utc::now();
        let conn = self.conn.lock().unwrap();

        let inserted = conn.execute(
            "INSERT INTO users (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
            params![normalized, password_hash, format_timestamp(now)],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(ApiError::EmailAlreadyExists);
            }
            Err(e) => return Err(e.into()),
        }

        let id = conn.last_insert_rowid() as u64;
        Ok(User {
            id: UserId(id),
            email: normalized,
            password_hash: password_hash.to_string(),
            phone_number: None,
            created_at: now,
        })
    }

    fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();

        let user = conn
            .query_row(
                "SELECT id, email, password_hash, phone_number, created_at FROM users WHERE id = ?1",
                params![user_id.0 as i64],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let normalized = email.to_lowercase();
        let conn = self.conn.lock().unwrap();

        let user = conn
            .query_row(
                "SELECT id, email, password_hash, phone_number, created_at FROM users WHERE email = ?1",
                params![normalized],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn update_phone_number(
        &self,
        user_id: UserId,
        phone_number: Option<&str>,
    ) -> StoreResult<User> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE users SET phone_number = ?1 WHERE id = ?2",
            params![phone_number, user_id.0 as i64],
        )?;
        drop(conn); // Release lock before calling get_user

        if changed == 0 {
            return Err(ApiError::UserNotFound);
        }
        self.get_user(user_id)?.ok_or(ApiError::UserNotFound)
    }
}

impl SessionStore for SqliteStore {
    fn create(&self, user_id: UserId) -> StoreResult<Session> {
        let session = Session {
            id: SessionId(Uuid::new_v4().to_string()),
            user_id,
            created_at: Utc::now(),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sessions (id, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![
                session.id.0,
                user_id.0 as i64,
                format_timestamp(session.created_at)
            ],
        )?;

        Ok(session)
    }

    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>> {
        let conn = self.conn.lock().unwrap();

        let session = conn
            .query_row(
                "SELECT id, user_id, created_at FROM sessions WHERE id = ?1",
                params![session_id.0],
                |row| {
                    let id: String = row.get(0)?;
                    let user_id: i64 = row.get(1)?;
                    let created_at: String = row.get(2)?;
                    Ok(Session {
                        id: SessionId(id),
                        user_id: UserId(user_id as u64),
                        created_at: parse_timestamp(&created_at),
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    fn delete(&self, session_id: &SessionId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id.0])?;
        Ok(())
    }

    fn delete_expired(&self, ttl: chrono::Duration) -> StoreResult<u64> {
        let cutoff = format_timestamp(Utc::now() - ttl);
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            "DELETE FROM sessions WHERE created_at < ?1",
            params![cutoff],
        )?;
        Ok(removed as u64)
    }
}

impl ContactStore for SqliteStore {
    fn list_contacts(&self, owner: UserId) -> StoreResult<Vec<Contact>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, number, created_at FROM contacts
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;

        let contacts = stmt
            .query_map(params![owner.0 as i64], contact_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    fn create_contact(&self, owner: UserId, draft: &ContactDraft) -> StoreResult<Contact> {
        let now = Utc::now();
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO contacts (user_id, name, number, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![owner.0 as i64, draft.name, draft.number, format_timestamp(now)],
        )?;

        let id = conn.last_insert_rowid() as u64;
        Ok(Contact {
            id: ContactId(id),
            name: draft.name.clone(),
            number: draft.number.clone(),
            created_at: parse_timestamp(&format_timestamp(now)),
        })
    }

    fn update_contact(
        &self,
        owner: UserId,
        id: ContactId,
        draft: &ContactDraft,
    ) -> StoreResult<Contact> {
        let conn = self.conn.lock().unwrap();

        let changed = conn.execute(
            "UPDATE contacts SET name = ?1, number = ?2 WHERE id = ?3 AND user_id = ?4",
            params![draft.name, draft.number, id.0 as i64, owner.0 as i64],
        )?;
        if changed == 0 {
            return Err(ApiError::ContactNotFound);
        }

        let contact = conn.query_row(
            "SELECT id, name, number, created_at FROM contacts WHERE id = ?1",
            params![id.0 as i64],
            contact_from_row,
        )?;
        Ok(contact)
    }

    fn delete_contact(&self, owner: UserId, id: ContactId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        let removed = conn.execute(
            "DELETE FROM contacts WHERE id = ?1 AND user_id = ?2",
            params![id.0 as i64, owner.0 as i64],
        )?;
        if removed == 0 {
            return Err(ApiError::ContactNotFound);
        }
        Ok(())
    }
}
