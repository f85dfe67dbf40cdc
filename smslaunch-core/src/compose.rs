//! Compose & send workflow
//!
//! Messages are never transmitted here. "Sending" means handing a
//! well-formed `sms:` URI to the OS through a [`Launcher`]; whether the user
//! then presses send in the native app is unobservable.
//!
//! Two mutually exclusive modes:
//! - stepped: a [`ComposeSession`] walks the selection one contact at a
//!   time (`Presenting(i)` until `Done`)
//! - group: [`group_send`] hands off one URI listing every number

use std::fmt;

use crate::contact::Contact;
use crate::sms::SmsUri;
use crate::{Error, Result};

/// Capability that opens the native messaging app for a URI.
///
/// Fire-and-forget: implementations log their own failures.
pub trait Launcher {
    fn launch(&self, uri: &SmsUri);
}

impl<L: Launcher + ?Sized> Launcher for &L {
    fn launch(&self, uri: &SmsUri) {
        (**self).launch(uri)
    }
}

/// Allow using Box<dyn Launcher> as a Launcher
impl Launcher for Box<dyn Launcher + Send + Sync> {
    fn launch(&self, uri: &SmsUri) {
        (**self).launch(uri)
    }
}

/// How a selection is handed off, chosen before starting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeMode {
    /// One hand-off per contact, driven by user actions
    #[default]
    Stepped,
    /// A single hand-off addressed to every contact
    Group,
}

/// User actions accepted by a stepped session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    /// Hand off the current contact and move to the next one
    SendAndNext,
    /// Hand off the last contact and finish
    SendAndFinish,
    /// Move on without a hand-off
    Skip,
    /// Abort the session
    Cancel,
}

impl fmt::Display for ComposeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComposeAction::SendAndNext => "Send & Next",
            ComposeAction::SendAndFinish => "Send & Finish",
            ComposeAction::Skip => "Skip",
            ComposeAction::Cancel => "Cancel",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeState {
    Presenting { index: usize },
    Done,
}

/// Outcome reported once when a session reaches `Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeSummary {
    pub total: usize,
    pub sent: usize,
    pub skipped: usize,
    pub cancelled: bool,
}

/// Where a session stands after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Presenting { index: usize },
    Done(ComposeSummary),
}

/// Result of applying one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// URI handed to the launcher, if the action performed a hand-off
    pub handoff: Option<SmsUri>,
    pub step: Step,
}

/// Ephemeral progress through an ordered list of selected contacts
#[derive(Debug, Clone)]
pub struct ComposeSession {
    contacts: Vec<Contact>,
    message: Option<String>,
    index: usize,
    sent: usize,
    skipped: usize,
    state: ComposeState,
}

impl ComposeSession {
    /// Start at the first contact. Requires `1 <= contacts.len() <= max_selected`.
    pub fn start(
        contacts: Vec<Contact>,
        message: Option<String>,
        max_selected: usize,
    ) -> Result<Self> {
        check_bounds(contacts.len(), max_selected)?;

        tracing::debug!(total = contacts.len(), "Compose session started");

        Ok(Self {
            contacts,
            message: message.filter(|m| !m.is_empty()),
            index: 0,
            sent: 0,
            skipped: 0,
            state: ComposeState::Presenting { index: 0 },
        })
    }

    pub fn state(&self) -> ComposeState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ComposeState::Done
    }

    /// Index of the contact being presented
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.contacts.len()
    }

    pub fn sent_count(&self) -> usize {
        self.sent
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.contacts.len()
    }

    /// Contact being presented, `None` once done
    pub fn current(&self) -> Option<&Contact> {
        match self.state {
            ComposeState::Presenting { index } => self.contacts.get(index),
            ComposeState::Done => None,
        }
    }

    /// URI the next hand-off would use
    pub fn current_uri(&self) -> Option<SmsUri> {
        self.current()
            .map(|c| SmsUri::single(&c.number, self.message.as_deref()))
    }

    /// Contacts not yet passed, starting with the current one.
    ///
    /// Empty once done. Feeding these into a new session resumes abandoned
    /// progress.
    pub fn remaining(&self) -> &[Contact] {
        match self.state {
            ComposeState::Presenting { index } => &self.contacts[index..],
            ComposeState::Done => &[],
        }
    }

    /// Share of contacts already passed, 0..=100
    pub fn progress_percent(&self) -> u8 {
        let passed = match self.state {
            ComposeState::Presenting { index } => index,
            ComposeState::Done => self.contacts.len(),
        };
        ((passed as f64 / self.contacts.len() as f64) * 100.0).round() as u8
    }

    /// Actions accepted in the current state
    pub fn available_actions(&self) -> Vec<ComposeAction> {
        match self.state {
            ComposeState::Done => Vec::new(),
            ComposeState::Presenting { .. } if self.is_last() => vec![
                ComposeAction::SendAndFinish,
                ComposeAction::Skip,
                ComposeAction::Cancel,
            ],
            ComposeState::Presenting { .. } => vec![
                ComposeAction::SendAndNext,
                ComposeAction::Skip,
                ComposeAction::Cancel,
            ],
        }
    }

    /// Apply a user action.
    ///
    /// The transition that reaches `Done` carries the summary; every later
    /// call fails with [`Error::SessionFinished`]. Unavailable actions fail
    /// without a hand-off or state change.
    pub fn apply<L: Launcher + ?Sized>(
        &mut self,
        action: ComposeAction,
        launcher: &L,
    ) -> Result<Transition> {
        let index = match self.state {
            ComposeState::Presenting { index } => index,
            ComposeState::Done => return Err(Error::SessionFinished),
        };

        if !self.available_actions().contains(&action) {
            return Err(Error::ActionUnavailable { action, index });
        }

        let transition = match action {
            ComposeAction::SendAndNext | ComposeAction::SendAndFinish => {
                let uri = SmsUri::single(&self.contacts[index].number, self.message.as_deref());
                launcher.launch(&uri);
                self.sent += 1;
                tracing::debug!(index, sent = self.sent, "Handed off contact");
                Transition {
                    handoff: Some(uri),
                    step: self.advance(),
                }
            }
            ComposeAction::Skip => {
                self.skipped += 1;
                Transition {
                    handoff: None,
                    step: self.advance(),
                }
            }
            ComposeAction::Cancel => {
                tracing::debug!(index, sent = self.sent, "Compose session cancelled");
                Transition {
                    handoff: None,
                    step: self.finish(true),
                }
            }
        };

        Ok(transition)
    }

    fn advance(&mut self) -> Step {
        if self.is_last() {
            return self.finish(false);
        }
        self.index += 1;
        self.state = ComposeState::Presenting { index: self.index };
        Step::Presenting { index: self.index }
    }

    fn finish(&mut self, cancelled: bool) -> Step {
        self.state = ComposeState::Done;
        Step::Done(ComposeSummary {
            total: self.contacts.len(),
            sent: self.sent,
            skipped: self.skipped,
            cancelled,
        })
    }
}

/// Hand off the whole selection as one group URI.
///
/// Performs exactly one launch and returns the URI used.
pub fn group_send<L: Launcher + ?Sized>(
    contacts: &[Contact],
    message: Option<&str>,
    max_selected: usize,
    launcher: &L,
) -> Result<SmsUri> {
    check_bounds(contacts.len(), max_selected)?;

    let uri = SmsUri::group(contacts.iter().map(|c| c.number.as_str()), message);
    launcher.launch(&uri);
    tracing::debug!(total = contacts.len(), "Handed off group message");

    Ok(uri)
}

fn check_bounds(count: usize, max: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::EmptySelection);
    }
    if count > max {
        return Err(Error::SelectionTooLarge { count, max });
    }
    Ok(())
}
