//! `sms:` hand-off URIs
//!
//! Format: `sms:<number>[,<number>...][?body=<encoded message>]`. Numbers and
//! scheme are emitted as-is; the body uses URI component encoding so that
//! native messaging apps decode it the same way browsers do.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped by URI component encoding
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A well-formed `sms:` URI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SmsUri(String);

impl SmsUri {
    /// URI addressed to a single number
    pub fn single(number: &str, body: Option<&str>) -> Self {
        Self::group([number], body)
    }

    /// URI addressed to every number at once, comma-joined
    pub fn group<'a, I>(numbers: I, body: Option<&str>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut uri = String::from("sms:");
        for (i, number) in numbers.into_iter().enumerate() {
            if i > 0 {
                uri.push(',');
            }
            uri.push_str(number);
        }

        if let Some(body) = body.filter(|b| !b.is_empty()) {
            uri.push_str("?body=");
            uri.extend(utf8_percent_encode(body, COMPONENT));
        }

        Self(uri)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SmsUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SmsUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
