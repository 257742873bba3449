//! Timer engine error types.

use std::time::Duration;

use thiserror::Error;

use crate::types::EngineState;

/// Errors reported by the countdown driver and the timer engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Configuration was rejected before any timer could run.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A countdown was started with a non-positive length.
    #[error("Invalid duration: {0} seconds (must be positive)")]
    InvalidDuration(u64),

    /// The requested command does not apply in the current state.
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        /// State the engine or countdown was in
        state: EngineState,
        /// Rejected command
        action: &'static str,
    },

    /// The advancement loop did not stop within the shutdown bound.
    #[error("Advancement loop did not stop within {0:?}")]
    ShutdownTimeout(Duration),
}
