//! Notifications for session completions.
//!
//! The engine never notifies anyone itself. The front end calls a
//! [`Notifier`] when it receives a `Completed` event, using the text built by
//! [`NotificationContent::for_completion`].

mod content;

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use thiserror::Error;

pub use content::NotificationContent;

/// Errors that can occur when sending a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The notification could not be written or delivered.
    #[error("Failed to send notification: {0}")]
    SendFailed(String),
}

/// Shows a notification to the user.
pub trait Notifier: Send + Sync {
    /// Shows `message` under `title`.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be shown.
    fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}

// ============================================================================
// TerminalNotifier
// ============================================================================

/// Prints notifications to stderr, optionally ringing the terminal bell.
#[derive(Debug)]
pub struct TerminalNotifier {
    bell: bool,
}

impl TerminalNotifier {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let mut stderr = std::io::stderr().lock();
        let bell = if self.bell { "\x07" } else { "" };
        writeln!(stderr, "\n{}** {} **\n   {}", bell, title, message)
            .map_err(|e| NotifyError::SendFailed(e.to_string()))
    }
}

// ============================================================================
// MockNotifier
// ============================================================================

/// Records notifications instead of showing them.
#[derive(Debug, Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<(String, String)>>,
    should_fail: AtomicBool,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotifyError::SendFailed("Mock failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}
