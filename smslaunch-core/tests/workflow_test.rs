//! End-to-end workflow tests: selection feeding both compose modes

use std::cell::RefCell;

use chrono::Utc;
use smslaunch_core::{
    group_send, ComposeAction, ComposeSession, Contact, ContactDraft, ContactId, Error, Launcher,
    Selection, SmsUri, Step,
};

// =============================================================================
// Test Fixtures
// =============================================================================

#[derive(Default)]
struct RecordingLauncher {
    launched: RefCell<Vec<String>>,
}

impl Launcher for RecordingLauncher {
    fn launch(&self, uri: &SmsUri) {
        self.launched.borrow_mut().push(uri.to_string());
    }
}

/// Contacts as the list shows them: newest first
fn listed(raw: &[(&str, &str)]) -> Vec<Contact> {
    raw.iter()
        .enumerate()
        .map(|(i, (name, number))| {
            let draft = ContactDraft::parse(name, number).unwrap();
            Contact {
                id: ContactId(i as u64 + 1),
                name: draft.name,
                number: draft.number,
                created_at: Utc::now(),
            }
        })
        .collect()
}

fn ids(contacts: &[Contact]) -> Vec<ContactId> {
    contacts.iter().map(|c| c.id).collect()
}

// =============================================================================
// Tests
// =============================================================================

/// Test: selecting, stepping and finishing over normalized numbers
#[test]
fn test_stepped_send_over_selection() {
    let contacts = listed(&[
        ("Alice", "+1 (111) 111-1111"),
        ("Bob", "+1 222 222 2222"),
        ("Carol", "+1-333-333-3333"),
    ]);
    let selection = Selection::new(20).toggle_all(&ids(&contacts));
    let launcher = RecordingLauncher::default();

    let mut session =
        ComposeSession::start(selection.ordered(&contacts), Some("Hi".into()), 20).unwrap();

    session.apply(ComposeAction::SendAndNext, &launcher).unwrap();
    assert_eq!(session.index(), 1);
    session.apply(ComposeAction::Skip, &launcher).unwrap();
    let t = session
        .apply(ComposeAction::SendAndFinish, &launcher)
        .unwrap();

    assert!(matches!(t.step, Step::Done(s) if s.sent == 2));
    assert_eq!(
        *launcher.launched.borrow(),
        vec!["sms:+11111111111?body=Hi", "sms:+13333333333?body=Hi"]
    );
}

/// Test: group mode hands off once to every selected number
#[test]
fn test_group_send_over_selection() {
    let contacts = listed(&[("A", "1111111"), ("B", "2222222"), ("C", "3333333")]);
    let selection = Selection::new(20)
        .insert(ContactId(3))
        .unwrap()
        .insert(ContactId(1))
        .unwrap();
    let launcher = RecordingLauncher::default();

    group_send(&selection.ordered(&contacts), Some("Hi"), 20, &launcher).unwrap();

    assert_eq!(
        *launcher.launched.borrow(),
        vec!["sms:1111111,3333333?body=Hi"]
    );
}

/// Test: cancelling at every intermediate index performs no further hand-off
#[test]
fn test_cancel_at_each_index() {
    let contacts = listed(&[
        ("A", "1111111"),
        ("B", "2222222"),
        ("C", "3333333"),
        ("D", "4444444"),
    ]);

    for cancel_at in 0..contacts.len() {
        let launcher = RecordingLauncher::default();
        let mut session = ComposeSession::start(contacts.clone(), None, 20).unwrap();

        for _ in 0..cancel_at {
            session.apply(ComposeAction::SendAndNext, &launcher).unwrap();
        }
        let t = session.apply(ComposeAction::Cancel, &launcher).unwrap();

        assert!(t.handoff.is_none());
        assert!(session.is_done());
        assert_eq!(launcher.launched.borrow().len(), cancel_at);
    }
}

/// Test: abandoned progress resumes with the remaining contacts
#[test]
fn test_resume_with_remaining() {
    let contacts = listed(&[("A", "1111111"), ("B", "2222222"), ("C", "3333333")]);
    let launcher = RecordingLauncher::default();

    let mut first = ComposeSession::start(contacts, None, 20).unwrap();
    first.apply(ComposeAction::SendAndNext, &launcher).unwrap();
    let remaining = first.remaining().to_vec();

    let mut resumed = ComposeSession::start(remaining, None, 20).unwrap();
    assert_eq!(resumed.total(), 2);
    resumed.apply(ComposeAction::SendAndNext, &launcher).unwrap();
    resumed
        .apply(ComposeAction::SendAndFinish, &launcher)
        .unwrap();

    assert_eq!(
        *launcher.launched.borrow(),
        vec!["sms:1111111", "sms:2222222", "sms:3333333"]
    );
}

/// Test: a selection can never exceed its cap, so neither can a session
#[test]
fn test_selection_cap_bounds_session() {
    let contacts = listed(&[("A", "1111111"), ("B", "2222222"), ("C", "3333333")]);
    let mut selection = Selection::new(2);
    for contact in &contacts[..2] {
        selection = selection.insert(contact.id).unwrap();
    }

    assert_eq!(
        selection.insert(contacts[2].id).unwrap_err(),
        Error::SelectionFull { max: 2 }
    );
    assert!(ComposeSession::start(selection.ordered(&contacts), None, 2).is_ok());
}
