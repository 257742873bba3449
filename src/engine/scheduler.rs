//! Session sequencing rules.
//!
//! Work sessions alternate with breaks; every `sessions_per_cycle`-th completed
//! work session is followed by a long break instead of a short one.

use crate::types::SessionType;

/// Decides which session follows a completed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionScheduler {
    sessions_per_cycle: u32,
}

impl SessionScheduler {
    /// Creates a scheduler. A cycle length of zero is treated as one.
    pub fn new(sessions_per_cycle: u32) -> Self {
        Self {
            sessions_per_cycle: sessions_per_cycle.max(1),
        }
    }

    pub fn sessions_per_cycle(&self) -> u32 {
        self.sessions_per_cycle
    }

    /// Returns the next session type and the updated work-session counter.
    ///
    /// `completed_work_sessions` is the counter *before* this completion; it is
    /// incremented here when `completed` is [`SessionType::Work`] and returned
    /// unchanged otherwise.
    pub fn next(&self, completed: SessionType, completed_work_sessions: u32) -> (SessionType, u32) {
        match completed {
            SessionType::Work => {
                let count = completed_work_sessions.saturating_add(1);
                let next = if count % self.sessions_per_cycle == 0 {
                    SessionType::LongBreak
                } else {
                    SessionType::ShortBreak
                };
                (next, count)
            }
            SessionType::ShortBreak | SessionType::LongBreak => {
                (SessionType::Work, completed_work_sessions)
            }
        }
    }
}

impl Default for SessionScheduler {
    fn default() -> Self {
        Self::new(4)
    }
}
