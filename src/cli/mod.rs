//! CLI module for the Pomodoro Timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `runner`: Interactive timer session
//! - `prefs`: Preferences subcommand
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod prefs;
pub mod runner;

pub use commands::{Cli, Commands, PrefsAction, RunArgs};
pub use display::Display;
