//! REST client for the SMS Launcher server
//!
//! Every call takes the [`ClientSession`] explicitly; authenticated calls
//! fail with [`ClientError::Auth`] before touching the network when the
//! session holds no token.

use reqwest::{Client as HttpClient, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use smslaunch_core::{Contact, ContactDraft, ContactId};

use crate::error::ClientError;
use crate::session::ClientSession;
use crate::Result;

/// Account as reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub phone_number: Option<String>,
}

/// Answer to register and login
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Deserialize)]
struct UserResponse {
    user: User,
}

#[derive(Deserialize)]
struct PhonesResponse {
    phones: Vec<Contact>,
}

#[derive(Deserialize)]
struct PhoneResponse {
    phone: Contact,
}

#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    http: HttpClient,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            http: HttpClient::new(),
        }
    }

    pub fn with_http(http: HttpClient) -> Self {
        Self { http }
    }

    fn url(session: &ClientSession, path: &str) -> String {
        format!("{}/api{}", session.base_url().trim_end_matches('/'), path)
    }

    fn authorized(req: RequestBuilder, session: &ClientSession) -> Result<RequestBuilder> {
        let token = session.token().ok_or_else(ClientError::not_authenticated)?;
        Ok(req.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
        let response = req.send().await?;
        if !response.status().is_success() {
            return Err(ClientError::from_response(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    // --- Identity ---

    pub async fn register(
        &self,
        session: &ClientSession,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        let req = self
            .http
            .post(Self::url(session, "/auth/register"))
            .json(&json!({ "email": email, "password": password }));
        Self::send(req).await
    }

    pub async fn login(
        &self,
        session: &ClientSession,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        let req = self
            .http
            .post(Self::url(session, "/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        Self::send(req).await
    }

    /// Current user for the session's token
    pub async fn me(&self, session: &ClientSession) -> Result<User> {
        let req = Self::authorized(self.http.get(Self::url(session, "/auth/me")), session)?;
        let body: UserResponse = Self::send(req).await?;
        Ok(body.user)
    }

    /// Set the sender number; an empty string clears it
    pub async fn update_phone(&self, session: &ClientSession, phone_number: &str) -> Result<User> {
        let req = Self::authorized(self.http.put(Self::url(session, "/auth/phone")), session)?
            .json(&json!({ "phoneNumber": phone_number }));
        let body: UserResponse = Self::send(req).await?;
        Ok(body.user)
    }

    /// Revoke the session's token on the server
    pub async fn logout(&self, session: &ClientSession) -> Result<()> {
        let req = Self::authorized(self.http.post(Self::url(session, "/auth/logout")), session)?;
        let _: Value = Self::send(req).await?;
        Ok(())
    }

    // --- Contacts ---

    /// The caller's contacts, newest first
    pub async fn list_contacts(&self, session: &ClientSession) -> Result<Vec<Contact>> {
        let req = Self::authorized(self.http.get(Self::url(session, "/phones")), session)?;
        let body: PhonesResponse = Self::send(req).await?;
        Ok(body.phones)
    }

    pub async fn add_contact(
        &self,
        session: &ClientSession,
        name: &str,
        number: &str,
    ) -> Result<Contact> {
        // Reject locally what the server would reject anyway
        ContactDraft::parse(name, number)?;

        let req = Self::authorized(self.http.post(Self::url(session, "/phones")), session)?
            .json(&json!({ "name": name, "number": number }));
        let body: PhoneResponse = Self::send(req).await?;
        Ok(body.phone)
    }

    pub async fn update_contact(
        &self,
        session: &ClientSession,
        id: ContactId,
        name: &str,
        number: &str,
    ) -> Result<Contact> {
        ContactDraft::parse(name, number)?;

        let path = format!("/phones/{}", id);
        let req = Self::authorized(self.http.put(Self::url(session, &path)), session)?
            .json(&json!({ "name": name, "number": number }));
        let body: PhoneResponse = Self::send(req).await?;
        Ok(body.phone)
    }

    pub async fn delete_contact(&self, session: &ClientSession, id: ContactId) -> Result<()> {
        let path = format!("/phones/{}", id);
        let req = Self::authorized(self.http.delete(Self::url(session, &path)), session)?;
        let _: Value = Self::send(req).await?;
        Ok(())
    }
}
