//! Display utilities for the Pomodoro Timer CLI.
//!
//! This module provides formatted output for:
//! - The live countdown line
//! - Status and completion messages
//! - Error messages and help

use std::io::Write;

use crate::preferences::Preferences;
use crate::types::{EngineSnapshot, EngineState, SessionType, Tick};

/// Width of the progress bar in characters.
const BAR_WIDTH: usize = 30;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Formats seconds as `HH:MM:SS`.
    pub fn format_time(total_seconds: u64) -> String {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }

    /// Renders a fixed-width progress bar for `percent` (0-100).
    pub fn progress_bar(percent: f64, fill: char) -> String {
        let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
        format!(
            "[{}{}]",
            fill.to_string().repeat(filled),
            "-".repeat(BAR_WIDTH - filled)
        )
    }

    /// Bar fill for a session: `#` while working, `=` during breaks.
    pub fn bar_fill(session_type: SessionType) -> char {
        if session_type.is_break() {
            '='
        } else {
            '#'
        }
    }

    /// Renders the live countdown line for a tick.
    pub fn tick_line(tick: &Tick) -> String {
        format!(
            "{:<13} {} {} {:>3.0}%",
            tick.session_type.label(),
            Self::format_time(tick.remaining_seconds),
            Self::progress_bar(tick.progress_percent, Self::bar_fill(tick.session_type)),
            tick.progress_percent
        )
    }

    /// Renders a one-line summary of the engine.
    pub fn status_line(snapshot: &EngineSnapshot) -> String {
        let state = match snapshot.engine_state {
            EngineState::Idle => "ready",
            EngineState::Running => "running",
            EngineState::Paused => "paused",
        };
        format!(
            "{} {} ({})  Sessions: {}/{}",
            snapshot.session_type.label(),
            Self::format_time(snapshot.remaining_seconds),
            state,
            snapshot.completed_work_sessions,
            snapshot.sessions_per_cycle
        )
    }

    /// Overwrites the current terminal line with the countdown.
    pub fn show_tick(tick: &Tick) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "\r{}", Self::tick_line(tick));
        let _ = stdout.flush();
    }

    /// Shows the engine status on its own line.
    pub fn show_status(snapshot: &EngineSnapshot) {
        println!("\n{}", Self::status_line(snapshot));
    }

    /// Shows the banner printed when a run starts.
    pub fn show_banner(snapshot: &EngineSnapshot) {
        println!("Pomodoro Timer");
        println!("─────────────────────────────");
        println!("{}", Self::status_line(snapshot));
        Self::show_help();
    }

    /// Shows the interactive key reference.
    pub fn show_help() {
        println!("Commands: <Enter>/s start-pause, p pause, c resume, r reset, i status, q quit");
    }

    /// Asks whether to abandon a session that is still running or paused.
    pub fn show_quit_prompt(snapshot: &EngineSnapshot) {
        println!(
            "\n{} is {}. Quit anyway? [y/N]",
            snapshot.session_type.label(),
            snapshot.engine_state
        );
    }

    /// Shows the stored preferences.
    pub fn show_preferences(preferences: &Preferences) {
        println!("theme:    {}", preferences.theme);
        println!("volume:   {}%", preferences.volume);
        println!("language: {}", preferences.language);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
