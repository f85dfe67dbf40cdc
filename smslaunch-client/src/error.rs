//! Client error types

use reqwest::StatusCode;
use serde::Deserialize;
use smslaunch_core::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Input the user can correct; carries per-field details when known
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("{0}")]
    NotFound(String),

    /// Missing, invalid or expired credential
    #[error("{0}")]
    Auth(String),

    /// Transport failures and unexpected server answers
    #[error("Request failed: {0}")]
    Infrastructure(String),

    #[error(transparent)]
    Core(smslaunch_core::Error),
}

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    errors: Vec<FieldError>,
}

impl ClientError {
    /// Classify a non-success response by its status code
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.json::<ErrorBody>().await.ok();
        Self::classify(status, body)
    }

    /// Rejected request bodies count as validation failures
    fn classify(status: StatusCode, body: Option<ErrorBody>) -> Self {
        let message = body
            .as_ref()
            .map(|b| b.message.clone())
            .unwrap_or_else(|| status.to_string());

        match status {
            StatusCode::BAD_REQUEST
            | StatusCode::CONFLICT
            | StatusCode::UNPROCESSABLE_ENTITY
            | StatusCode::UNSUPPORTED_MEDIA_TYPE => ClientError::Validation {
                message,
                errors: body.map(|b| b.errors).unwrap_or_default(),
            },
            StatusCode::UNAUTHORIZED => ClientError::Auth(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Infrastructure(message),
        }
    }

    pub fn not_authenticated() -> Self {
        ClientError::Auth("Not authenticated".to_string())
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// Per-field details of a validation failure
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ClientError::Validation { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl From<smslaunch_core::Error> for ClientError {
    fn from(err: smslaunch_core::Error) -> Self {
        match err {
            smslaunch_core::Error::Validation(errors) => ClientError::Validation {
                message: errors
                    .first()
                    .map(|e| e.msg.clone())
                    .unwrap_or_else(|| "Validation failed".to_string()),
                errors,
            },
            other => ClientError::Core(other),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Infrastructure(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Infrastructure(err.to_string())
    }
}
