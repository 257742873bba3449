//! Command definitions for the Pomodoro Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};

use crate::preferences::THEMES;
use crate::types::TimerConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro Timer - work/break interval timer for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-timer",
    version,
    about = "Work/break interval timer for the terminal",
    long_about = "Runs Pomodoro cycles in the terminal: work sessions alternate with short \
                  breaks, and every few work sessions a long break is inserted.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,

        /// Preferences file to use instead of the default location
        #[arg(long, global = true)]
        file: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Preferences subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PrefsAction {
    /// Print the current preferences
    Show,

    /// Update one or more preferences
    Set {
        /// Colour theme
        #[arg(long, value_parser = PossibleValuesParser::new(THEMES))]
        theme: Option<String>,

        /// Alert volume (0-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        volume: Option<u8>,

        /// Display language tag (e.g. "en", "ja")
        #[arg(long, value_parser = validate_language)]
        language: Option<String>,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command.
///
/// Duration flags override values from `--config`, which in turn override the
/// built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Work duration in minutes (1-120)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=120))]
    pub work: Option<u64>,

    /// Short break duration in minutes (1-60)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=60))]
    pub short_break: Option<u64>,

    /// Long break duration in minutes (1-60)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=60))]
    pub long_break: Option<u64>,

    /// Work sessions before a long break (1-12)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub sessions: Option<u32>,

    /// Interpret duration flags as seconds instead of minutes
    #[arg(long)]
    pub seconds: bool,

    /// JSON timer configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preferences file to use instead of the default location
    #[arg(long)]
    pub prefs_file: Option<PathBuf>,

    /// Do not ring the terminal bell on completion
    #[arg(long)]
    pub no_bell: bool,
}

impl RunArgs {
    /// Builds the timer configuration from the config file and flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the result
    /// fails validation.
    pub fn to_config(&self) -> Result<TimerConfig> {
        let mut config = match &self.config {
            Some(path) => TimerConfig::from_json_file(path)?,
            None => TimerConfig::default(),
        };

        let scale = if self.seconds { 1 } else { 60 };
        if let Some(work) = self.work {
            config.durations.work = work * scale;
        }
        if let Some(short_break) = self.short_break {
            config.durations.short_break = short_break * scale;
        }
        if let Some(long_break) = self.long_break {
            config.durations.long_break = long_break * scale;
        }
        if let Some(sessions) = self.sessions {
            config.sessions_per_cycle = sessions;
        }

        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates a language tag.
///
/// - Must not be empty
/// - At most 16 characters of ASCII letters, digits or '-'
fn validate_language(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("language must not be empty".to_string());
    }
    if s.len() > 16 {
        return Err("language must be at most 16 characters".to_string());
    }
    if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err("language may only contain letters, digits and '-'".to_string());
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================
