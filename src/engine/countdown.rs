//! Countdown driver for a single interval.
//!
//! Remaining time is derived from a monotonic reference instant and the
//! accumulated paused time rather than decremented once per wake-up, so the
//! count stays correct however irregularly the advancement loop is scheduled.

use tokio::time::{Duration, Instant};

use crate::types::{EngineState, SessionType};

use super::TimerError;

/// Time accounting for one running interval.
#[derive(Debug, Clone)]
pub struct Countdown {
    session_type: SessionType,
    total_seconds: u64,
    remaining_seconds: u64,
    reference_start: Instant,
    accumulated_pause: Duration,
    paused_at: Option<Instant>,
    cancelled: bool,
}

impl Countdown {
    /// Begins a new interval of `total_seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidDuration`] if `total_seconds` is zero.
    pub fn start(session_type: SessionType, total_seconds: u64) -> Result<Self, TimerError> {
        Self::start_at(session_type, total_seconds, Instant::now())
    }

    fn start_at(
        session_type: SessionType,
        total_seconds: u64,
        now: Instant,
    ) -> Result<Self, TimerError> {
        if total_seconds == 0 {
            return Err(TimerError::InvalidDuration(total_seconds));
        }
        Ok(Self {
            session_type,
            total_seconds,
            remaining_seconds: total_seconds,
            reference_start: now,
            accumulated_pause: Duration::ZERO,
            paused_at: None,
            cancelled: false,
        })
    }

    /// Freezes the countdown.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidTransition`] if already paused or cancelled.
    pub fn pause(&mut self) -> Result<(), TimerError> {
        self.pause_at(Instant::now())
    }

    fn pause_at(&mut self, now: Instant) -> Result<(), TimerError> {
        if self.cancelled || self.paused_at.is_some() {
            return Err(self.transition_error("pause"));
        }
        self.sample_at(now);
        self.paused_at = Some(now);
        Ok(())
    }

    /// Continues a paused countdown, crediting the paused span.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidTransition`] if not paused.
    pub fn resume(&mut self) -> Result<(), TimerError> {
        self.resume_at(Instant::now())
    }

    fn resume_at(&mut self, now: Instant) -> Result<(), TimerError> {
        let Some(paused_at) = self.paused_at.filter(|_| !self.cancelled) else {
            return Err(self.transition_error("resume"));
        };
        self.accumulated_pause += now.saturating_duration_since(paused_at);
        self.paused_at = None;
        Ok(())
    }

    /// Returns the remaining whole seconds.
    ///
    /// The value never increases between calls and stays constant while paused
    /// or after cancellation.
    pub fn sample(&mut self) -> u64 {
        self.sample_at(Instant::now())
    }

    fn sample_at(&mut self, now: Instant) -> u64 {
        if self.cancelled {
            return self.remaining_seconds;
        }
        let until = self.paused_at.unwrap_or(now);
        let active = until
            .saturating_duration_since(self.reference_start)
            .saturating_sub(self.accumulated_pause);
        let computed = self.total_seconds.saturating_sub(active.as_secs());
        self.remaining_seconds = self.remaining_seconds.min(computed);
        self.remaining_seconds
    }

    /// Stops the interval from advancing. Repeated calls are harmless.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    /// Last sampled remaining time, without touching the clock.
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    fn transition_error(&self, action: &'static str) -> TimerError {
        let state = if self.cancelled {
            EngineState::Idle
        } else if self.paused_at.is_some() {
            EngineState::Paused
        } else {
            EngineState::Running
        };
        TimerError::InvalidTransition { state, action }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_start_rejects_zero() {
        let result = Countdown::start(SessionType::Work, 0);
        assert_eq!(result.unwrap_err(), TimerError::InvalidDuration(0));
    }

    #[test]
    fn test_start_sets_full_remaining() {
        let countdown = Countdown::start(SessionType::ShortBreak, 300).unwrap();
        assert_eq!(countdown.remaining_seconds(), 300);
        assert_eq!(countdown.total_seconds(), 300);
        assert_eq!(countdown.session_type(), SessionType::ShortBreak);
    }

    #[test]
    fn test_sample_truncates_to_whole_seconds() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start_at(SessionType::Work, 10, t0).unwrap();

        assert_eq!(countdown.sample_at(t0 + millis(999)), 10);
        assert_eq!(countdown.sample_at(t0 + millis(1000)), 9);
        assert_eq!(countdown.sample_at(t0 + millis(3500)), 7);
    }

    #[test]
    fn test_sample_reaches_zero_and_clamps() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start_at(SessionType::Work, 5, t0).unwrap();

        assert_eq!(countdown.sample_at(t0 + secs(5)), 0);
        assert_eq!(countdown.sample_at(t0 + secs(60)), 0);
        assert_eq!(countdown.remaining_seconds(), 0);
    }

    #[test]
    fn test_sample_is_non_increasing_under_jitter() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start_at(SessionType::Work, 30, t0).unwrap();

        let mut previous = countdown.remaining_seconds();
        let mut offset = 0;
        for step in [37, 250, 3, 900, 1, 1400, 120, 2000, 80, 4100] {
            offset += step;
            let value = countdown.sample_at(t0 + millis(offset));
            assert!(value <= previous, "remaining went up at +{}ms", offset);
            previous = value;
        }
        assert_eq!(previous, 30 - offset / 1000);
    }

    #[test]
    fn test_out_of_order_instant_does_not_increase_remaining() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start_at(SessionType::Work, 10, t0).unwrap();

        assert_eq!(countdown.sample_at(t0 + secs(4)), 6);
        assert_eq!(countdown.sample_at(t0 + secs(2)), 6);
    }

    #[test]
    fn test_pause_freezes_remaining() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start_at(SessionType::Work, 20, t0).unwrap();

        countdown.pause_at(t0 + millis(3200)).unwrap();
        assert_eq!(countdown.remaining_seconds(), 17);
        assert_eq!(countdown.sample_at(t0 + secs(100)), 17);
        assert!(countdown.is_paused());
    }

    #[test]
    fn test_pause_resume_round_trip_preserves_remaining() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start_at(SessionType::Work, 20, t0).unwrap();

        countdown.pause_at(t0 + secs(5)).unwrap();
        countdown.resume_at(t0 + secs(65)).unwrap();

        assert_eq!(countdown.accumulated_pause, secs(60));
        assert_eq!(countdown.sample_at(t0 + secs(65)), 15);
        assert_eq!(countdown.sample_at(t0 + secs(67)), 13);
    }

    #[test]
    fn test_many_pause_cycles_do_not_drift() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start_at(SessionType::Work, 100, t0).unwrap();

        // 10 cycles of 1s running then 7.3s paused
        let mut now = t0;
        for _ in 0..10 {
            now += secs(1);
            countdown.pause_at(now).unwrap();
            now += millis(7300);
            countdown.resume_at(now).unwrap();
        }

        assert_eq!(countdown.sample_at(now), 90);
        assert_eq!(countdown.accumulated_pause, millis(73_000));
    }

    #[test]
    fn test_double_pause_is_invalid() {
        let mut countdown = Countdown::start(SessionType::Work, 10).unwrap();
        countdown.pause().unwrap();

        let err = countdown.pause().unwrap_err();
        assert_eq!(
            err,
            TimerError::InvalidTransition {
                state: EngineState::Paused,
                action: "pause"
            }
        );
    }

    #[test]
    fn test_resume_without_pause_is_invalid() {
        let mut countdown = Countdown::start(SessionType::Work, 10).unwrap();

        let err = countdown.resume().unwrap_err();
        assert_eq!(
            err,
            TimerError::InvalidTransition {
                state: EngineState::Running,
                action: "resume"
            }
        );
    }

    #[test]
    fn test_cancel_is_idempotent_and_freezes() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start_at(SessionType::Work, 10, t0).unwrap();
        countdown.sample_at(t0 + secs(2));

        countdown.cancel();
        countdown.cancel();

        assert!(countdown.cancelled);
        assert_eq!(countdown.sample_at(t0 + secs(9)), 8);
        assert!(countdown.pause().is_err());
        assert!(countdown.resume().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_down_with_tokio_clock() {
        let mut countdown = Countdown::start(SessionType::LongBreak, 3).unwrap();

        tokio::time::advance(millis(1500)).await;
        assert_eq!(countdown.sample(), 2);

        countdown.pause().unwrap();
        tokio::time::advance(secs(30)).await;
        assert_eq!(countdown.sample(), 2);

        countdown.resume().unwrap();
        tokio::time::advance(secs(2)).await;
        assert_eq!(countdown.sample(), 0);
    }
}
