//! SMS Launcher Core Library
//!
//! Domain logic shared by the server and the client:
//! - Contacts are validated and their numbers normalized before storage
//! - A bounded selection picks which contacts a message goes to
//! - A compose session hands one `sms:` URI per contact to the OS, or a
//!   single grouped URI for the whole selection

pub mod compose;
pub mod contact;
pub mod error;
pub mod selection;
pub mod sms;

pub use compose::{
    group_send, ComposeAction, ComposeMode, ComposeSession, ComposeState, ComposeSummary,
    Launcher, Step, Transition,
};
pub use contact::{Contact, ContactDraft, ContactId, FieldError};
pub use error::Error;
pub use selection::{Selection, DEFAULT_MAX_SELECTED};
pub use sms::SmsUri;

/// Result type for smslaunch-core operations
pub type Result<T> = std::result::Result<T, Error>;
