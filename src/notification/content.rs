//! Notification text for session completions.

use crate::types::{Completed, Durations, SessionType};

/// Title and body of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub message: String,
}

impl NotificationContent {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Builds the notification shown when a session runs out.
    pub fn for_completion(completed: &Completed, durations: &Durations) -> Self {
        let next_length = describe_length(durations.get(completed.next_session_type));
        match completed.next_session_type {
            SessionType::LongBreak => Self::new(
                "Time for a long break!",
                format!("Take {} to relax and recharge.", next_length),
            ),
            SessionType::ShortBreak => Self::new(
                "Time for a short break!",
                format!("Take {} to relax.", next_length),
            ),
            SessionType::Work => Self::new("Break finished!", "Time to get back to work."),
        }
    }
}

/// Renders a length as whole minutes when possible, e.g. "15 minutes".
fn describe_length(seconds: u64) -> String {
    let (value, unit) = if seconds >= 60 && seconds % 60 == 0 {
        (seconds / 60, "minute")
    } else {
        (seconds, "second")
    };
    if value == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", value, unit)
    }
}
