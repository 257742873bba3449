//! Core data types for the Pomodoro Timer.
//!
//! This module defines the data structures used for:
//! - Session and engine state identification
//! - Timer configuration with validation
//! - Event payloads published to listeners

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::TimerError;

// ============================================================================
// SessionType
// ============================================================================

/// The kind of interval being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// Focused work session
    Work,
    /// Short break between work sessions
    ShortBreak,
    /// Long break at the end of a cycle
    LongBreak,
}

impl SessionType {
    /// Returns the string representation of the session type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::ShortBreak => "short_break",
            SessionType::LongBreak => "long_break",
        }
    }

    /// Returns the banner label shown above the countdown.
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Work => "WORK SESSION",
            SessionType::ShortBreak => "SHORT BREAK",
            SessionType::LongBreak => "LONG BREAK",
        }
    }

    /// Returns true for either kind of break.
    pub fn is_break(&self) -> bool {
        matches!(self, SessionType::ShortBreak | SessionType::LongBreak)
    }
}

impl Default for SessionType {
    fn default() -> Self {
        SessionType::Work
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// EngineState
// ============================================================================

/// Lifecycle state of a timer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// No interval is running; the next session is loaded and ready
    Idle,
    /// The countdown is advancing
    Running,
    /// The countdown is frozen until resumed
    Paused,
}

impl EngineState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Running => "running",
            EngineState::Paused => "paused",
        }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        EngineState::Idle
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Durations
// ============================================================================

/// Length of each session type, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Durations {
    /// Work session length
    pub work: u64,
    /// Short break length
    pub short_break: u64,
    /// Long break length
    pub long_break: u64,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work: 25 * 60,
            short_break: 5 * 60,
            long_break: 15 * 60,
        }
    }
}

impl Durations {
    /// Creates durations from explicit second values.
    pub fn new(work: u64, short_break: u64, long_break: u64) -> Self {
        Self {
            work,
            short_break,
            long_break,
        }
    }

    /// Returns the configured length of the given session type.
    pub fn get(&self, session_type: SessionType) -> u64 {
        match session_type {
            SessionType::Work => self.work,
            SessionType::ShortBreak => self.short_break,
            SessionType::LongBreak => self.long_break,
        }
    }

    /// Validates that every duration is positive.
    pub fn validate(&self) -> Result<(), TimerError> {
        for session_type in [
            SessionType::Work,
            SessionType::ShortBreak,
            SessionType::LongBreak,
        ] {
            if self.get(session_type) == 0 {
                return Err(TimerError::InvalidConfiguration(format!(
                    "{} duration must be positive",
                    session_type
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

fn default_sessions_per_cycle() -> u32 {
    4
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_pause_poll_ms() -> u64 {
    250
}

fn default_shutdown_timeout_ms() -> u64 {
    100
}

/// Configuration for a timer engine.
///
/// Every field has a default, so a partial JSON document is accepted:
///
/// ```
/// use pomodoro_timer::types::TimerConfig;
///
/// let config: TimerConfig = serde_json::from_str(r#"{"sessions_per_cycle": 2}"#).unwrap();
/// assert_eq!(config.sessions_per_cycle, 2);
/// assert_eq!(config.durations.work, 1500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Length of each session type
    #[serde(default)]
    pub durations: Durations,
    /// Completed work sessions before a long break is inserted
    #[serde(default = "default_sessions_per_cycle")]
    pub sessions_per_cycle: u32,
    /// Sampling resolution of the advancement loop
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Coarse poll interval used while paused
    #[serde(default = "default_pause_poll_ms")]
    pub pause_poll_ms: u64,
    /// Upper bound on waiting for the advancement loop to stop during reset
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            durations: Durations::default(),
            sessions_per_cycle: default_sessions_per_cycle(),
            tick_interval_ms: default_tick_interval_ms(),
            pause_poll_ms: default_pause_poll_ms(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
        }
    }
}

impl TimerConfig {
    /// Returns the configuration with the given durations.
    pub fn with_durations(mut self, durations: Durations) -> Self {
        self.durations = durations;
        self
    }

    /// Returns the configuration with the given cycle length.
    pub fn with_sessions_per_cycle(mut self, sessions: u32) -> Self {
        self.sessions_per_cycle = sessions;
        self
    }

    /// Returns the configuration with the given sampling resolution.
    pub fn with_tick_interval_ms(mut self, millis: u64) -> Self {
        self.tick_interval_ms = millis;
        self
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. The result is
    /// not validated; call [`TimerConfig::validate`] before use.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidConfiguration`] for a non-positive duration,
    /// a cycle length below one, or a zero tick, poll or shutdown interval.
    pub fn validate(&self) -> Result<(), TimerError> {
        self.durations.validate()?;
        if self.sessions_per_cycle < 1 {
            return Err(TimerError::InvalidConfiguration(
                "sessions_per_cycle must be at least 1".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(TimerError::InvalidConfiguration(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.pause_poll_ms == 0 {
            return Err(TimerError::InvalidConfiguration(
                "pause_poll_ms must be positive".to_string(),
            ));
        }
        if self.shutdown_timeout_ms == 0 {
            return Err(TimerError::InvalidConfiguration(
                "shutdown_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub(crate) fn pause_poll(&self) -> Duration {
        Duration::from_millis(self.pause_poll_ms)
    }

    pub(crate) fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

// ============================================================================
// Events and snapshots
// ============================================================================

/// Point-in-time view of an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Session currently loaded or running
    pub session_type: SessionType,
    /// Engine lifecycle state
    pub engine_state: EngineState,
    /// Remaining seconds in the loaded session
    pub remaining_seconds: u64,
    /// Full length of the loaded session
    pub total_seconds: u64,
    /// Work sessions completed since the engine was created
    pub completed_work_sessions: u32,
    /// Configured cycle length
    pub sessions_per_cycle: u32,
}

/// Periodic progress report for the running interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Session being timed
    pub session_type: SessionType,
    /// Remaining whole seconds
    pub remaining_seconds: u64,
    /// Full length of the session
    pub total_seconds: u64,
    /// `100 × (1 − remaining / total)`
    pub progress_percent: f64,
}

impl Tick {
    pub(crate) fn new(session_type: SessionType, remaining_seconds: u64, total_seconds: u64) -> Self {
        Self {
            session_type,
            remaining_seconds,
            total_seconds,
            progress_percent: progress_percent(remaining_seconds, total_seconds),
        }
    }
}

/// Reported once when a session runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completed {
    /// Session that just finished
    pub previous_session_type: SessionType,
    /// Session now loaded and waiting for `start`
    pub next_session_type: SessionType,
    /// Counter after this completion
    pub completed_work_sessions: u32,
}

/// Computes completion percentage for a countdown.
pub fn progress_percent(remaining_seconds: u64, total_seconds: u64) -> f64 {
    if total_seconds == 0 {
        return 100.0;
    }
    let remaining = remaining_seconds.min(total_seconds) as f64;
    100.0 * (1.0 - remaining / total_seconds as f64)
}

// ============================================================================
// Tests
// ============================================================================
