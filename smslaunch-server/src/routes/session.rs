//! Bearer token handling

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{ContactStore, Session, SessionId, SessionStore, UserStore};

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve the caller's session, rejecting missing, unknown or expired tokens.
///
/// Expired sessions are deleted on sight.
pub fn require_session<U, S, C>(
    headers: &HeaderMap,
    state: &AppState<U, S, C>,
) -> Result<Session, ApiError>
where
    U: UserStore,
    S: SessionStore,
    C: ContactStore,
{
    let token = bearer_token(headers).ok_or(ApiError::NotAuthenticated)?;
    let session_id = SessionId(token.to_string());

    let session = state
        .session_store
        .get(&session_id)?
        .ok_or(ApiError::NotAuthenticated)?;

    if session.is_expired(state.session_ttl) {
        tracing::debug!(user_id = session.user_id.0, "Rejected expired session");
        state.session_store.delete(&session.id)?;
        return Err(ApiError::NotAuthenticated);
    }

    Ok(session)
}
