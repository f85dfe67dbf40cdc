//! Server error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use smslaunch_core::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Malformed JSON body")]
    MalformedBody,

    #[error("Phone number not found")]
    ContactNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Password too short (minimum 8 characters)")]
    PasswordTooShort,

    #[error("Password too long (maximum 80 characters)")]
    PasswordTooLong,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Validation failure on a single field
    pub fn field(path: &str, msg: &str, value: &str) -> Self {
        ApiError::Validation(vec![FieldError::new(path, msg, value)])
    }
}

impl From<smslaunch_core::Error> for ApiError {
    fn from(err: smslaunch_core::Error) -> Self {
        match err {
            smslaunch_core::Error::Validation(errors) => ApiError::Validation(errors),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(errors) => return validation_response(errors),
            ApiError::MalformedBody => (StatusCode::BAD_REQUEST, "Malformed JSON body"),
            ApiError::ContactNotFound => (StatusCode::NOT_FOUND, "Phone number not found"),
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            ApiError::EmailAlreadyExists => (StatusCode::CONFLICT, "Email already exists"),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ApiError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "Not authenticated"),
            ApiError::PasswordTooShort => {
                (StatusCode::BAD_REQUEST, "Password too short (minimum 8 characters)")
            }
            ApiError::PasswordTooLong => {
                (StatusCode::BAD_REQUEST, "Password too long (maximum 80 characters)")
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({ "message": message });
        (status, axum::Json(body)).into_response()
    }
}

/// 400 with one entry per rejected field
fn validation_response(errors: &[FieldError]) -> Response {
    let message = errors
        .first()
        .map(|e| e.msg.as_str())
        .unwrap_or("Validation failed");
    let errors: Vec<_> = errors
        .iter()
        .map(|e| {
            json!({
                "type": "field",
                "path": e.path,
                "msg": e.msg,
                "value": e.value,
                "location": "body",
            })
        })
        .collect();

    let body = json!({ "message": message, "errors": errors });
    (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
}
