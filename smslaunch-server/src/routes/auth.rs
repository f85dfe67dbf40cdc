//! Identity endpoints: registration, login, current user, sender number

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;
use smslaunch_core::contact::parse_number;

use super::body::Body;
use crate::crypto::{hash_password, verify_password};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{ContactStore, SessionStore, User, UserStore};

/// Minimum password length
const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum password length
const MAX_PASSWORD_LENGTH: usize = 80;

/// Public view of a user account
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: u64,
    pub email: String,
    pub phone_number: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            email: user.email,
            phone_number: user.phone_number,
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: UserInfo,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/auth/register
pub async fn register<U, S, C>(
    State(state): State<Arc<AppState<U, S, C>>>,
    body: Bytes,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError>
where
    U: UserStore,
    S: SessionStore,
    C: ContactStore,
{
    let body = Body::parse(&body)?;
    let email = validate_email(&body.text("email"))?;
    let password = body.text("password");

    // Validate password length
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(ApiError::PasswordTooShort);
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(ApiError::PasswordTooLong);
    }

    if state.user_store.get_user_by_email(&email)?.is_some() {
        return Err(ApiError::EmailAlreadyExists);
    }

    let password_hash = hash_password(&password, state.password_cost)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = state.user_store.create_user(&email, &password_hash)?;
    let session = state.session_store.create(user.id)?;

    tracing::info!(user_id = user.id.0, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: session.id.0,
            user: user.into(),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login<U, S, C>(
    State(state): State<Arc<AppState<U, S, C>>>,
    body: Bytes,
) -> Result<Json<AuthResponse>, ApiError>
where
    U: UserStore,
    S: SessionStore,
    C: ContactStore,
{
    let body = Body::parse(&body)?;

    // Find user by email
    let user = state
        .user_store
        .get_user_by_email(body.text("email").trim())?
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    let valid = verify_password(&body.text("password"), &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let session = state.session_store.create(user.id)?;
    tracing::debug!(user_id = user.id.0, "User logged in");

    Ok(Json(AuthResponse {
        token: session.id.0,
        user: user.into(),
    }))
}

/// GET /api/auth/me
pub async fn me<U, S, C>(
    State(state): State<Arc<AppState<U, S, C>>>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError>
where
    U: UserStore,
    S: SessionStore,
    C: ContactStore,
{
    let session = super::session::require_session(&headers, state.as_ref())?;

    // A session outliving its user is as good as no session
    let user = state
        .user_store
        .get_user(session.user_id)?
        .ok_or(ApiError::NotAuthenticated)?;

    Ok(Json(UserResponse { user: user.into() }))
}

/// PUT /api/auth/phone
/// Set the sender number; an empty, null or missing value clears it
pub async fn update_phone<U, S, C>(
    State(state): State<Arc<AppState<U, S, C>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UserResponse>, ApiError>
where
    U: UserStore,
    S: SessionStore,
    C: ContactStore,
{
    let session = super::session::require_session(&headers, state.as_ref())?;

    let raw = Body::parse(&body)?.text("phoneNumber");
    let phone_number = if raw.trim().is_empty() {
        None
    } else {
        Some(parse_number("phoneNumber", &raw).map_err(|e| ApiError::Validation(vec![e]))?)
    };

    let user = state
        .user_store
        .update_phone_number(session.user_id, phone_number.as_deref())?;

    Ok(Json(UserResponse { user: user.into() }))
}

/// POST /api/auth/logout
pub async fn logout<U, S, C>(
    State(state): State<Arc<AppState<U, S, C>>>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError>
where
    U: UserStore,
    S: SessionStore,
    C: ContactStore,
{
    let session = super::session::require_session(&headers, state.as_ref())?;
    state.session_store.delete(&session.id)?;

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// Trim and lowercase an email, rejecting obviously malformed input
fn validate_email(raw: &str) -> Result<String, ApiError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::field("email", "Email is required", &email));
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !well_formed {
        return Err(ApiError::field("email", "Please enter a valid email", &email));
    }

    Ok(email)
}
