//! Pomodoro Timer Library
//!
//! This library provides the core functionality for the Pomodoro Timer CLI.
//! It includes:
//! - Timer engine: countdown, session sequencing and event delivery
//! - Type definitions for configuration, snapshots and events
//! - User preferences and their JSON store
//! - Completion notifications
//! - CLI command parsing and display utilities

pub mod cli;
pub mod engine;
pub mod notification;
pub mod preferences;
pub mod types;

// Re-export commonly used types for convenience
pub use engine::{
    QueueDispatcher, ThreadDispatcher, TimerEngine, TimerError, TimerEvent, TimerListener,
};
pub use types::{
    Completed, Durations, EngineSnapshot, EngineState, SessionType, Tick, TimerConfig,
};
