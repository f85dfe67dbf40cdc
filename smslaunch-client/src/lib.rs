//! SMS Launcher Client
//!
//! Talks to the SMS Launcher server, keeps the contact list and selection,
//! and walks a selection through the device's messaging app one contact
//! at a time (or as a single group message).

pub mod api;
pub mod config;
pub mod contacts;
pub mod driver;
pub mod error;
pub mod launcher;
pub mod session;

pub use api::{ApiClient, AuthResponse, User};
pub use config::ClientConfig;
pub use contacts::ContactList;
pub use driver::ComposeDriver;
pub use error::ClientError;
pub use launcher::{CommandLauncher, PrintLauncher};
pub use session::ClientSession;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
