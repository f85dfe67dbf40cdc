//! Bounded contact selection
//!
//! `Selection` is a value: every operation returns a new selection and
//! leaves the receiver untouched. The cap is enforced in `insert`, the only
//! place a selection can grow one id at a time.

use crate::contact::{Contact, ContactId};
use crate::{Error, Result};

/// Default cap on simultaneously selected contacts
pub const DEFAULT_MAX_SELECTED: usize = 20;

/// An ordered set of selected contact ids, never larger than `max`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ContactId>,
    max: usize,
}

impl Selection {
    /// Empty selection with the given cap
    pub fn new(max: usize) -> Self {
        Self {
            ids: Vec::new(),
            max,
        }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= self.max
    }

    pub fn contains(&self, id: ContactId) -> bool {
        self.ids.contains(&id)
    }

    /// Selected ids in the order they were selected
    pub fn ids(&self) -> &[ContactId] {
        &self.ids
    }

    /// Add an id. Selecting beyond the cap is rejected.
    pub fn insert(&self, id: ContactId) -> Result<Self> {
        if self.contains(id) {
            return Ok(self.clone());
        }
        if self.is_full() {
            return Err(Error::SelectionFull { max: self.max });
        }
        let mut next = self.clone();
        next.ids.push(id);
        Ok(next)
    }

    pub fn remove(&self, id: ContactId) -> Self {
        let mut next = self.clone();
        next.ids.retain(|&selected| selected != id);
        next
    }

    /// Deselect if selected, otherwise select
    pub fn toggle(&self, id: ContactId) -> Result<Self> {
        if self.contains(id) {
            Ok(self.remove(id))
        } else {
            self.insert(id)
        }
    }

    pub fn clear(&self) -> Self {
        Self::new(self.max)
    }

    /// "Select all" over `listed`, in list order.
    ///
    /// Selects the first `max` listed ids (all of them when the list fits).
    /// When that exact set is already selected the selection is cleared.
    pub fn toggle_all(&self, listed: &[ContactId]) -> Self {
        let target: Vec<ContactId> = listed.iter().copied().take(self.max).collect();

        let fully_selected =
            self.ids.len() == target.len() && target.iter().all(|&id| self.contains(id));
        if fully_selected {
            return self.clear();
        }

        Self {
            ids: target,
            max: self.max,
        }
    }

    /// Drop ids that are no longer listed
    pub fn retain_listed(&self, listed: &[ContactId]) -> Self {
        let mut next = self.clone();
        next.ids.retain(|id| listed.contains(id));
        next
    }

    /// Selected contacts, in list order
    pub fn ordered(&self, contacts: &[Contact]) -> Vec<Contact> {
        contacts
            .iter()
            .filter(|c| self.contains(c.id))
            .cloned()
            .collect()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SELECTED)
    }
}
