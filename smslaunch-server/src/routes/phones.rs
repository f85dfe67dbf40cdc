//! Contact ("phone") endpoints
//!
//! Every handler resolves the caller's session first and scopes the store
//! call to that user. Bodies are read only after that check. Ids that do
//! not parse are reported as not found.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;
use smslaunch_core::{Contact, ContactDraft, ContactId};

use super::body::Body;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{ContactStore, SessionStore, UserStore};

#[derive(Serialize)]
pub struct ListPhonesResponse {
    pub phones: Vec<Contact>,
}

#[derive(Serialize)]
pub struct PhoneResponse {
    pub message: String,
    pub phone: Contact,
}

#[derive(Serialize)]
pub struct DeletePhoneResponse {
    pub message: String,
}

/// GET /api/phones
pub async fn list_phones<U, S, C>(
    State(state): State<Arc<AppState<U, S, C>>>,
    headers: HeaderMap,
) -> Result<Json<ListPhonesResponse>, ApiError>
where
    U: UserStore,
    S: SessionStore,
    C: ContactStore,
{
    let session = super::session::require_session(&headers, state.as_ref())?;

    let phones = state.contact_store.list_contacts(session.user_id)?;

    Ok(Json(ListPhonesResponse { phones }))
}

/// POST /api/phones
pub async fn add_phone<U, S, C>(
    State(state): State<Arc<AppState<U, S, C>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<PhoneResponse>), ApiError>
where
    U: UserStore,
    S: SessionStore,
    C: ContactStore,
{
    let session = super::session::require_session(&headers, state.as_ref())?;
    let draft = parse_draft(&body)?;

    let phone = state.contact_store.create_contact(session.user_id, &draft)?;
    tracing::info!(user_id = session.user_id.0, contact_id = phone.id.0, "Contact added");

    Ok((
        StatusCode::CREATED,
        Json(PhoneResponse {
            message: "Phone number added".to_string(),
            phone,
        }),
    ))
}

/// PUT /api/phones/:id
pub async fn update_phone<U, S, C>(
    State(state): State<Arc<AppState<U, S, C>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PhoneResponse>, ApiError>
where
    U: UserStore,
    S: SessionStore,
    C: ContactStore,
{
    let session = super::session::require_session(&headers, state.as_ref())?;
    let draft = parse_draft(&body)?;
    let id = parse_id(&id)?;

    let phone = state
        .contact_store
        .update_contact(session.user_id, id, &draft)?;
    tracing::info!(user_id = session.user_id.0, contact_id = id.0, "Contact updated");

    Ok(Json(PhoneResponse {
        message: "Phone number updated".to_string(),
        phone,
    }))
}

/// DELETE /api/phones/:id
pub async fn delete_phone<U, S, C>(
    State(state): State<Arc<AppState<U, S, C>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeletePhoneResponse>, ApiError>
where
    U: UserStore,
    S: SessionStore,
    C: ContactStore,
{
    let session = super::session::require_session(&headers, state.as_ref())?;
    let id = parse_id(&id)?;

    state.contact_store.delete_contact(session.user_id, id)?;
    tracing::info!(user_id = session.user_id.0, contact_id = id.0, "Contact deleted");

    Ok(Json(DeletePhoneResponse {
        message: "Phone number deleted".to_string(),
    }))
}

fn parse_draft(raw: &Bytes) -> Result<ContactDraft, ApiError> {
    let body = Body::parse(raw)?;
    Ok(ContactDraft::parse(&body.text("name"), &body.text("number"))?)
}

fn parse_id(raw: &str) -> Result<ContactId, ApiError> {
    raw.parse().map_err(|_| ApiError::ContactNotFound)
}
