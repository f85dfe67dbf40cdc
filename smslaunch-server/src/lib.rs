//! SMS Launcher Server
//!
//! Stores each user's phone contacts behind bearer-token authentication.
//! The server never sends messages; clients hand `sms:` URIs to the
//! device's messaging app.

pub mod config;
pub mod crypto;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::ApiError;
pub use state::AppState;
pub use store::{
    ContactStore, InMemoryContactStore, InMemorySessionStore, InMemoryUserStore, SessionStore,
    SqliteStore, UserStore,
};
