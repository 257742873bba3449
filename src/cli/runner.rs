//! Interactive terminal session.
//!
//! The terminal is the "UI context" here: engine events are queued through a
//! [`QueueDispatcher`] and drained by the main loop, which also owns stdin
//! commands. Listener code therefore never runs on the advancement loop.

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

use crate::engine::{DeliveryQueue, QueueDispatcher, TimerEngine, TimerError, TimerListener};
use crate::notification::{NotificationContent, Notifier, TerminalNotifier};
use crate::preferences::{JsonPreferencesStore, Preferences, PreferencesGateway};
use crate::types::{Completed, Durations, EngineSnapshot, EngineState, Tick};

use super::commands::RunArgs;
use super::display::Display;

/// How often queued events are drained onto the terminal.
const REFRESH_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// Command
// ============================================================================

/// A line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start when idle or paused, pause when running
    Toggle,
    Pause,
    Resume,
    Reset,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parses one input line.
    pub fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "s" | "start" => Command::Toggle,
            "p" | "pause" => Command::Pause,
            "c" | "resume" => Command::Resume,
            "r" | "reset" => Command::Reset,
            "i" | "status" => Command::Status,
            "h" | "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

// ============================================================================
// TerminalView
// ============================================================================

/// Listener that renders engine events to the terminal.
pub struct TerminalView {
    durations: Durations,
    notifier: Arc<dyn Notifier>,
}

impl TerminalView {
    pub fn new(durations: Durations, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            durations,
            notifier,
        }
    }
}

impl TimerListener for TerminalView {
    fn on_tick(&self, tick: &Tick) -> Result<()> {
        Display::show_tick(tick);
        Ok(())
    }

    fn on_completed(&self, completed: &Completed) -> Result<()> {
        let content = NotificationContent::for_completion(completed, &self.durations);
        self.notifier
            .notify(&content.title, &content.message)
            .context("Failed to show completion notification")?;
        Ok(())
    }

    fn on_state_changed(&self, snapshot: &EngineSnapshot) -> Result<()> {
        if snapshot.engine_state != EngineState::Running {
            Display::show_status(snapshot);
        }
        Ok(())
    }
}

// ============================================================================
// Session loop
// ============================================================================

/// Runs an interactive session until the user quits or stdin closes.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub async fn run(args: &RunArgs) -> Result<()> {
    let config = args.to_config()?;
    let preferences = load_preferences(args)?;
    tracing::debug!(?preferences, "Loaded preferences");

    let notifier: Arc<dyn Notifier> =
        Arc::new(TerminalNotifier::new(!args.no_bell && !preferences.is_muted()));
    let (dispatcher, queue) = QueueDispatcher::new();
    let engine = TimerEngine::new(config.clone(), Arc::new(dispatcher))?;
    engine.subscribe(Arc::new(TerminalView::new(config.durations, notifier)));

    Display::show_banner(&engine.current_state().await);

    let mut commands = spawn_stdin_reader();
    let mut refresh = interval(REFRESH_INTERVAL);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut confirming_quit = false;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted");
                break;
            }
            command = commands.recv() => match command {
                None => break,
                Some(command) if confirming_quit => {
                    confirming_quit = false;
                    if confirms_quit(&command) {
                        break;
                    }
                    println!("Quit cancelled");
                }
                Some(Command::Quit) => {
                    let snapshot = engine.current_state().await;
                    if snapshot.engine_state == EngineState::Idle {
                        break;
                    }
                    Display::show_quit_prompt(&snapshot);
                    confirming_quit = true;
                }
                Some(command) => handle_command(&engine, &queue, command).await,
            },
            _ = refresh.tick() => {
                queue.run_pending();
            }
        }
    }

    if let Err(e) = engine.reset().await {
        tracing::warn!(error = %e, "Timer did not shut down cleanly");
    }
    println!();
    Ok(())
}

async fn handle_command(engine: &TimerEngine, queue: &DeliveryQueue, command: Command) {
    let result = match command {
        Command::Toggle => toggle(engine).await,
        Command::Pause => engine.pause().await,
        Command::Resume => engine.resume().await,
        Command::Reset => engine.reset().await,
        Command::Status => {
            queue.run_pending();
            Display::show_status(&engine.current_state().await);
            Ok(())
        }
        Command::Help => {
            Display::show_help();
            Ok(())
        }
        Command::Unknown(input) => {
            Display::show_error(&format!("unknown command '{}'", input));
            Display::show_help();
            Ok(())
        }
        Command::Quit => Ok(()),
    };

    if let Err(e) = result {
        Display::show_error(&e.to_string());
    }
}

/// Returns true if the answer to the quit prompt is yes.
fn confirms_quit(answer: &Command) -> bool {
    match answer {
        Command::Quit => true,
        Command::Unknown(input) => matches!(input.as_str(), "y" | "yes"),
        _ => false,
    }
}

/// Pauses a running timer, otherwise starts or resumes it.
async fn toggle(engine: &TimerEngine) -> Result<(), TimerError> {
    match engine.current_state().await.engine_state {
        EngineState::Running => engine.pause().await,
        EngineState::Idle | EngineState::Paused => engine.start().await,
    }
}

/// Reads stdin lines on a plain thread; blocking reads stay off the runtime.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<Command> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Command::parse(&line)).is_err() {
                break;
            }
        }
    });
    rx
}

/// Loads preferences, falling back to defaults for a corrupt file or a
/// missing config directory. Other I/O failures are reported.
fn load_preferences(args: &RunArgs) -> Result<Preferences> {
    let loaded = match &args.prefs_file {
        Some(path) => JsonPreferencesStore::new(path).load(),
        None => JsonPreferencesStore::default_location().and_then(|store| store.load()),
    };

    match loaded {
        Ok(preferences) => Ok(preferences),
        Err(e) if e.should_use_defaults() => {
            tracing::warn!(error = %e, "Using default preferences");
            Ok(Preferences::default())
        }
        Err(e) => Err(e).context("Failed to load preferences"),
    }
}

// ============================================================================
// Tests
// ============================================================================
