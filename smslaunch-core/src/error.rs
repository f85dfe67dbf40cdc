//! Error types for SMS Launcher

use thiserror::Error;

use crate::compose::ComposeAction;
use crate::contact::FieldError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Validation failed: {}", describe(.0))]
    Validation(Vec<FieldError>),

    #[error("Maximum {max} numbers can be selected")]
    SelectionFull { max: usize },

    #[error("Please select at least one phone number")]
    EmptySelection,

    #[error("{count} contacts selected, at most {max} allowed")]
    SelectionTooLarge { count: usize, max: usize },

    #[error("{action} is not available at contact {}", .index + 1)]
    ActionUnavailable { action: ComposeAction, index: usize },

    #[error("Compose session already finished")]
    SessionFinished,
}

impl Error {
    /// Field errors carried by a validation failure, empty otherwise
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Error::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.msg))
        .collect::<Vec<_>>()
        .join("; ")
}
