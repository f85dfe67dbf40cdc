//! Client session context
//!
//! Owns the server address, the bearer token and the signed-in user. The
//! token is optionally persisted to a file so it survives restarts.

use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{ApiClient, AuthResponse, User};
use crate::error::ClientError;
use crate::Result;

#[derive(Debug, Clone)]
pub struct ClientSession {
    base_url: String,
    token: Option<String>,
    user: Option<User>,
    token_file: Option<PathBuf>,
}

impl ClientSession {
    /// Unauthenticated session that keeps its token in memory only
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            user: None,
            token_file: None,
        }
    }

    /// Persist the token at `path`
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token_file(&self) -> Option<&Path> {
        self.token_file.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Restore a persisted token and validate it against the server.
    ///
    /// A rejected token is discarded. Other failures leave it in place so
    /// a later attempt can succeed.
    pub async fn init_on_load(&mut self, api: &ApiClient) -> Result<Option<&User>> {
        if !self.restore_token()? {
            return Ok(None);
        }

        let result = api.me(self).await;
        match result {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "Restored session");
                self.user = Some(user);
                Ok(self.user.as_ref())
            }
            Err(e) if e.is_auth() => {
                tracing::info!("Stored token rejected, signing out");
                self.clear()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Load the persisted token without asking the server about it
    ///
    /// Returns whether a token was found.
    pub fn restore_token(&mut self) -> Result<bool> {
        match self.read_token()? {
            Some(token) => {
                self.token = Some(token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn register(&mut self, api: &ApiClient, email: &str, password: &str) -> Result<&User> {
        let response = api.register(self, email, password).await?;
        self.authenticate(response)
    }

    pub async fn login(&mut self, api: &ApiClient, email: &str, password: &str) -> Result<&User> {
        let response = api.login(self, email, password).await?;
        self.authenticate(response)
    }

    /// Revoke the token and forget it locally, whatever the server says
    pub async fn logout(&mut self, api: &ApiClient) -> Result<()> {
        if self.token.is_some() {
            if let Err(e) = api.logout(self).await {
                tracing::warn!(error = %e, "Server logout failed");
            }
        }
        self.clear()
    }

    pub async fn update_phone(&mut self, api: &ApiClient, phone_number: &str) -> Result<&User> {
        let result = api.update_phone(self, phone_number).await;
        let user = result.map_err(|e| self.discard_on_auth(e))?;
        Ok(&*self.user.insert(user))
    }

    /// Sign out locally when `err` says the credential is no longer valid
    pub fn discard_on_auth(&mut self, err: ClientError) -> ClientError {
        if err.is_auth() {
            if let Err(e) = self.clear() {
                tracing::warn!(error = %e, "Failed to remove token file");
            }
        }
        err
    }

    /// Forget token and user, removing the persisted token
    pub fn clear(&mut self) -> Result<()> {
        self.token = None;
        self.user = None;

        if let Some(path) = &self.token_file {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn authenticate(&mut self, response: AuthResponse) -> Result<&User> {
        self.write_token(&response.token)?;
        self.token = Some(response.token);
        Ok(&*self.user.insert(response.user))
    }

    fn read_token(&self) -> Result<Option<String>> {
        let Some(path) = &self.token_file else {
            return Ok(self.token.clone());
        };
        match fs::read_to_string(path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_token(&self, token: &str) -> Result<()> {
        if let Some(path) = &self.token_file {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, token)?;
        }
        Ok(())
    }
}
