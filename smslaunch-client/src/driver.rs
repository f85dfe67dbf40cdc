//! Drives a stepped compose session against a launcher.
//!
//! After each hand-off the driver pauses before accepting the next action
//! so the messaging app has time to come to the foreground. Actions are
//! applied through `&mut self`, one at a time.

use std::time::Duration;

use smslaunch_core::{ComposeAction, ComposeSession, ComposeSummary, Launcher, Step, Transition};

use crate::Result;

pub struct ComposeDriver<L> {
    session: ComposeSession,
    launcher: L,
    delay: Duration,
}

impl<L: Launcher> ComposeDriver<L> {
    pub fn new(session: ComposeSession, launcher: L, delay: Duration) -> Self {
        Self {
            session,
            launcher,
            delay,
        }
    }

    pub fn session(&self) -> &ComposeSession {
        &self.session
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Apply one action, waiting out the hand-off delay when it launched
    pub async fn apply(&mut self, action: ComposeAction) -> Result<Transition> {
        let transition = self.session.apply(action, &self.launcher)?;

        if transition.handoff.is_some() && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(transition)
    }

    /// Send to every remaining contact without prompting
    pub async fn send_all(&mut self) -> Result<ComposeSummary> {
        loop {
            let action = if self.session.is_last() {
                ComposeAction::SendAndFinish
            } else {
                ComposeAction::SendAndNext
            };

            if let Step::Done(summary) = self.apply(action).await?.step {
                return Ok(summary);
            }
        }
    }

    pub fn into_session(self) -> ComposeSession {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::Utc;
    use smslaunch_core::{Contact, ContactId, SmsUri};

    use super::*;
    use crate::error::ClientError;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl Launcher for Recorder {
        fn launch(&self, uri: &SmsUri) {
            self.0.borrow_mut().push(uri.to_string());
        }
    }

    fn contacts(numbers: &[&str]) -> Vec<Contact> {
        numbers
            .iter()
            .enumerate()
            .map(|(i, number)| Contact {
                id: ContactId(i as u64 + 1),
                name: format!("Contact {}", i + 1),
                number: number.to_string(),
                created_at: Utc::now(),
            })
            .collect()
    }

    fn driver(numbers: &[&str], delay: Duration) -> ComposeDriver<Recorder> {
        let session = ComposeSession::start(contacts(numbers), Some("Hi".into()), 20).unwrap();
        ComposeDriver::new(session, Recorder::default(), delay)
    }

    #[tokio::test]
    async fn test_send_all() {
        let mut driver = driver(&["111", "222", "333"], Duration::ZERO);

        let summary = driver.send_all().await.unwrap();

        assert_eq!(summary.sent, 3);
        assert!(!summary.cancelled);
        assert_eq!(
            *driver.launcher().0.borrow(),
            vec!["sms:111?body=Hi", "sms:222?body=Hi", "sms:333?body=Hi"]
        );
    }

    #[tokio::test]
    async fn test_delay_only_after_handoff() {
        let delay = Duration::from_millis(200);
        let mut driver = driver(&["111", "222", "333"], delay);

        let started = tokio::time::Instant::now();
        driver.apply(ComposeAction::Skip).await.unwrap();
        assert!(started.elapsed() < delay);

        let started = tokio::time::Instant::now();
        driver.apply(ComposeAction::SendAndNext).await.unwrap();
        assert!(started.elapsed() >= delay);
    }

    #[tokio::test]
    async fn test_finished_session_rejects_actions() {
        let mut driver = driver(&["111"], Duration::ZERO);
        driver.apply(ComposeAction::Cancel).await.unwrap();

        let err = driver.apply(ComposeAction::Skip).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Core(smslaunch_core::Error::SessionFinished)
        ));
        assert!(driver.launcher().0.borrow().is_empty());
    }
}
