//! Contact list model: loaded contacts, the bounded selection and the
//! message draft.
//!
//! Store calls go through [`ApiClient`]. A NotFound answer means the local
//! list is stale, so it is reloaded before the error is returned. An Auth
//! answer signs the session out.

use smslaunch_core::{group_send, ComposeSession, Contact, ContactId, Launcher, Selection, SmsUri};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::session::ClientSession;
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct ContactList {
    contacts: Vec<Contact>,
    selection: Selection,
    message: String,
}

impl ContactList {
    pub fn new(max_selected: usize) -> Self {
        Self {
            contacts: Vec::new(),
            selection: Selection::new(max_selected),
            message: String::new(),
        }
    }

    /// Contacts in display order, newest first
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected contacts in list order
    pub fn selected_contacts(&self) -> Vec<Contact> {
        self.selection.ordered(&self.contacts)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Reload from the server, dropping selected ids that disappeared
    pub async fn refresh(&mut self, api: &ApiClient, session: &mut ClientSession) -> Result<()> {
        let result = api.list_contacts(session).await;
        let contacts = result.map_err(|e| session.discard_on_auth(e))?;

        self.contacts = contacts;
        self.selection = self.selection.retain_listed(&self.ids());
        tracing::debug!(count = self.contacts.len(), "Contacts loaded");
        Ok(())
    }

    /// Create a contact and show it at the top of the list
    pub async fn add(
        &mut self,
        api: &ApiClient,
        session: &mut ClientSession,
        name: &str,
        number: &str,
    ) -> Result<Contact> {
        let result = api.add_contact(session, name, number).await;
        let contact = result.map_err(|e| session.discard_on_auth(e))?;

        self.contacts.insert(0, contact.clone());
        Ok(contact)
    }

    pub async fn update(
        &mut self,
        api: &ApiClient,
        session: &mut ClientSession,
        id: ContactId,
        name: &str,
        number: &str,
    ) -> Result<Contact> {
        let result = api.update_contact(session, id, name, number).await;
        let contact = match result {
            Ok(contact) => contact,
            Err(e) => return Err(self.recover(api, session, e).await),
        };

        if let Some(slot) = self.contacts.iter_mut().find(|c| c.id == id) {
            *slot = contact.clone();
        }
        Ok(contact)
    }

    /// Delete a contact, removing it from the list and the selection
    pub async fn delete(
        &mut self,
        api: &ApiClient,
        session: &mut ClientSession,
        id: ContactId,
    ) -> Result<()> {
        let result = api.delete_contact(session, id).await;
        if let Err(e) = result {
            return Err(self.recover(api, session, e).await);
        }

        self.contacts.retain(|c| c.id != id);
        self.selection = self.selection.remove(id);
        Ok(())
    }

    /// Toggle one contact; fails without change when the selection is full
    pub fn toggle(&mut self, id: ContactId) -> Result<()> {
        self.selection = self.selection.toggle(id)?;
        Ok(())
    }

    /// Select the first contacts up to the cap, or clear if already selected
    pub fn toggle_all(&mut self) {
        self.selection = self.selection.toggle_all(&self.ids());
    }

    pub fn clear_selection(&mut self) {
        self.selection = self.selection.clear();
    }

    /// Stepped session over the selected contacts
    pub fn start_compose(&self) -> Result<ComposeSession> {
        let session = ComposeSession::start(
            self.selected_contacts(),
            Some(self.message.clone()),
            self.selection.max(),
        )?;
        Ok(session)
    }

    /// Hand off every selected contact as one group message, then clear
    /// the selection
    pub fn send_group<L: Launcher + ?Sized>(&mut self, launcher: &L) -> Result<SmsUri> {
        let message = Some(self.message.as_str()).filter(|m| !m.is_empty());
        let uri = group_send(
            &self.selected_contacts(),
            message,
            self.selection.max(),
            launcher,
        )?;
        self.clear_selection();
        Ok(uri)
    }

    /// Called once a compose session reports completion
    pub fn finish_compose(&mut self) {
        self.clear_selection();
    }

    fn ids(&self) -> Vec<ContactId> {
        self.contacts.iter().map(|c| c.id).collect()
    }

    /// Sign out on Auth, reload on NotFound, and hand the error back
    async fn recover(
        &mut self,
        api: &ApiClient,
        session: &mut ClientSession,
        err: ClientError,
    ) -> ClientError {
        let err = session.discard_on_auth(err);
        if err.is_not_found() {
            tracing::info!("Contact no longer exists, reloading list");
            if let Err(e) = self.refresh(api, session).await {
                tracing::warn!(error = %e, "Reload after not found failed");
            }
        }
        err
    }
}
