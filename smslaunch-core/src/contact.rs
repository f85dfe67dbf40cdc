//! Phone contacts and their validation rules
//!
//! A contact is a display name plus a phone number. Input is trimmed,
//! checked against the accepted phone shape, and the number is stored
//! with its formatting characters (spaces, hyphens, parentheses) removed.

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Maximum length of a contact name, in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// Accepted shape of a phone number before normalization
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]{7,20}$").expect("phone pattern compiles"));

/// Characters stripped from a number before it is stored
static FORMATTING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-()]").expect("formatting pattern compiles"));

/// Unique contact identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContactId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(ContactId)
    }
}

/// A stored contact as seen by its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    /// Normalized number: digits with an optional leading '+'
    pub number: String,
    pub created_at: DateTime<Utc>,
}

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field (`name`, `number`, `phoneNumber`)
    pub path: String,
    /// Human readable message
    pub msg: String,
    /// The value as submitted
    pub value: String,
}

impl FieldError {
    pub fn new(path: &str, msg: &str, value: &str) -> Self {
        Self {
            path: path.to_string(),
            msg: msg.to_string(),
            value: value.to_string(),
        }
    }
}

/// Validated name and normalized number, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub number: String,
}

impl ContactDraft {
    /// Validate raw form input, collecting every field error
    pub fn parse(name: &str, number: &str) -> Result<Self> {
        let mut errors = Vec::new();

        let name = name.trim();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Contact name is required", name));
        } else if name.chars().count() > MAX_NAME_LENGTH {
            errors.push(FieldError::new(
                "name",
                "Name cannot exceed 100 characters",
                name,
            ));
        }

        let number = match parse_number("number", number) {
            Ok(number) => number,
            Err(e) => {
                errors.push(e);
                String::new()
            }
        };

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        Ok(Self {
            name: name.to_string(),
            number,
        })
    }
}

/// Check a raw number against the accepted shape and normalize it.
///
/// `path` names the field in the returned error.
pub fn parse_number(path: &str, raw: &str) -> std::result::Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(path, "Phone number is required", trimmed));
    }
    if !PHONE_PATTERN.is_match(trimmed) {
        return Err(FieldError::new(
            path,
            "Please enter a valid phone number",
            trimmed,
        ));
    }
    Ok(normalize_number(trimmed))
}

/// Strip whitespace, hyphens and parentheses, keeping everything else
pub fn normalize_number(raw: &str) -> String {
    FORMATTING.replace_all(raw, "").into_owned()
}
