//! Timer engine for the Pomodoro Timer.
//!
//! This module provides the engine facade:
//! - State transitions (Idle → Running ⇄ Paused → Idle)
//! - Background advancement loop driven by `tokio::time::interval`
//! - Session sequencing on completion
//! - Event publication through a [`Dispatcher`]
//!
//! All mutable state sits behind one `tokio::sync::Mutex`, shared by the
//! control calls and the advancement loop. Events are stamped with the
//! subscriber epoch while that lock is held, and `reset` advances the epoch
//! under the same lock. Advancing the epoch waits for any delivery already in
//! progress, so nothing emitted for a reset interval is delivered once `reset`
//! returns.

use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, timeout, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::types::{
    Completed, Durations, EngineSnapshot, EngineState, SessionType, Tick, TimerConfig,
};

use super::countdown::Countdown;
use super::dispatch::Dispatcher;
use super::listener::{ListenerId, Subscribers, TimerEvent, TimerListener};
use super::scheduler::SessionScheduler;
use super::TimerError;

// ============================================================================
// Internal state
// ============================================================================

/// Handle to the running advancement loop.
struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

struct Inner {
    config: TimerConfig,
    scheduler: SessionScheduler,
    state: EngineState,
    session_type: SessionType,
    total_seconds: u64,
    remaining_seconds: u64,
    completed_work_sessions: u32,
    countdown: Option<Countdown>,
    worker: Option<Worker>,
}

impl Inner {
    fn new(config: TimerConfig) -> Self {
        let total_seconds = config.durations.work;
        Self {
            scheduler: SessionScheduler::new(config.sessions_per_cycle),
            config,
            state: EngineState::Idle,
            session_type: SessionType::Work,
            total_seconds,
            remaining_seconds: total_seconds,
            completed_work_sessions: 0,
            countdown: None,
            worker: None,
        }
    }

    /// Loads `session_type` at its full configured length.
    fn load_session(&mut self, session_type: SessionType) {
        self.session_type = session_type;
        self.total_seconds = self.config.durations.get(session_type);
        self.remaining_seconds = self.total_seconds;
    }

    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            session_type: self.session_type,
            engine_state: self.state,
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds,
            completed_work_sessions: self.completed_work_sessions,
            sessions_per_cycle: self.scheduler.sessions_per_cycle(),
        }
    }

    fn invalid(&self, action: &'static str) -> TimerError {
        TimerError::InvalidTransition {
            state: self.state,
            action,
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    subscribers: Arc<Subscribers>,
    dispatcher: Arc<dyn Dispatcher>,
    resumed: Notify,
    shutdown: CancellationToken,
}

impl Shared {
    /// Hands `event` to the dispatcher. Must be called with `inner` locked.
    fn emit(&self, event: TimerEvent) {
        let epoch = self.subscribers.epoch();
        let subscribers = Arc::clone(&self.subscribers);
        self.dispatcher
            .dispatch(Box::new(move || subscribers.deliver(epoch, &event)));
    }

    /// Samples the live countdown once. Returns true when the loop should stop.
    fn advance_once(&self, inner: &mut Inner) -> bool {
        let Some(countdown) = inner.countdown.as_mut() else {
            return true;
        };

        let remaining = countdown.sample();
        let session_type = countdown.session_type();
        inner.remaining_seconds = remaining;
        self.emit(TimerEvent::Tick(Tick::new(
            session_type,
            remaining,
            countdown.total_seconds(),
        )));

        if remaining > 0 {
            return false;
        }

        countdown.cancel();
        inner.countdown = None;
        // The loop is finishing on its own; dropping the handle detaches it.
        inner.worker = None;

        let (next, count) = inner
            .scheduler
            .next(session_type, inner.completed_work_sessions);
        inner.completed_work_sessions = count;
        inner.load_session(next);
        inner.state = EngineState::Idle;

        tracing::info!(
            completed = %session_type,
            next = %next,
            completed_work_sessions = count,
            "Session completed"
        );

        self.emit(TimerEvent::Completed(Completed {
            previous_session_type: session_type,
            next_session_type: next,
            completed_work_sessions: count,
        }));
        self.emit(TimerEvent::StateChanged(inner.snapshot()));
        true
    }
}

// ============================================================================
// Advancement loop
// ============================================================================

async fn advance(
    shared: Arc<Shared>,
    cancel: CancellationToken,
    tick_interval: Duration,
    pause_poll: Duration,
) {
    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let mut guard = shared.inner.lock().await;
        if cancel.is_cancelled() {
            break;
        }

        let state = guard.state;
        match state {
            EngineState::Idle => break,
            EngineState::Paused => {
                drop(guard);
                // No time accounting while paused; just wait to be woken.
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = shared.resumed.notified() => {}
                    _ = sleep(pause_poll) => {}
                }
                ticker.reset_immediately();
            }
            EngineState::Running => {
                if shared.advance_once(&mut guard) {
                    break;
                }
            }
        }
    }

    tracing::debug!("Advancement loop stopped");
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Pomodoro timer engine.
///
/// Control calls may come from any task; they serialize with the background
/// advancement loop on a single lock. Listener code only ever runs through the
/// [`Dispatcher`] supplied at construction.
///
/// Dropping the engine cancels its advancement loop.
pub struct TimerEngine {
    shared: Arc<Shared>,
}

impl TimerEngine {
    /// Creates an idle engine with the work session loaded.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidConfiguration`] if `config` fails validation.
    pub fn new(config: TimerConfig, dispatcher: Arc<dyn Dispatcher>) -> Result<Self, TimerError> {
        config.validate()?;
        tracing::debug!(?config, "Creating timer engine");

        Ok(Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner::new(config)),
                subscribers: Arc::new(Subscribers::default()),
                dispatcher,
                resumed: Notify::new(),
                shutdown: CancellationToken::new(),
            }),
        })
    }

    /// Replaces the durations and cycle length.
    ///
    /// Only allowed while idle; the loaded session is reloaded at its new
    /// length. The completed-work counter is kept.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidTransition`] unless idle, or
    /// [`TimerError::InvalidConfiguration`] if the values are rejected.
    pub async fn configure(
        &self,
        durations: Durations,
        sessions_per_cycle: u32,
    ) -> Result<(), TimerError> {
        let mut guard = self.shared.inner.lock().await;
        let inner = &mut *guard;
        if inner.state != EngineState::Idle {
            return Err(inner.invalid("configure"));
        }

        let config = inner
            .config
            .clone()
            .with_durations(durations)
            .with_sessions_per_cycle(sessions_per_cycle);
        config.validate()?;

        inner.scheduler = SessionScheduler::new(config.sessions_per_cycle);
        inner.config = config;
        inner.load_session(inner.session_type);

        tracing::info!(?durations, sessions_per_cycle, "Timer reconfigured");
        self.shared
            .emit(TimerEvent::StateChanged(inner.snapshot()));
        Ok(())
    }

    /// Starts the loaded session, or resumes a paused one.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidTransition`] if already running.
    pub async fn start(&self) -> Result<(), TimerError> {
        let mut guard = self.shared.inner.lock().await;
        let inner = &mut *guard;

        match inner.state {
            EngineState::Running => Err(inner.invalid("start")),
            EngineState::Paused => self.resume_locked(inner),
            EngineState::Idle => {
                let countdown = Countdown::start(inner.session_type, inner.total_seconds)?;

                if let Some(stale) = inner.worker.take() {
                    stale.cancel.cancel();
                }

                let cancel = self.shared.shutdown.child_token();
                let handle = tokio::spawn(advance(
                    Arc::clone(&self.shared),
                    cancel.clone(),
                    inner.config.tick_interval(),
                    inner.config.pause_poll(),
                ));

                inner.remaining_seconds = countdown.remaining_seconds();
                inner.countdown = Some(countdown);
                inner.worker = Some(Worker { cancel, handle });
                inner.state = EngineState::Running;

                tracing::info!(
                    session = %inner.session_type,
                    seconds = inner.total_seconds,
                    "Session started"
                );
                self.shared
                    .emit(TimerEvent::StateChanged(inner.snapshot()));
                Ok(())
            }
        }
    }

    /// Pauses the running session.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidTransition`] unless running.
    pub async fn pause(&self) -> Result<(), TimerError> {
        let mut guard = self.shared.inner.lock().await;
        let inner = &mut *guard;
        if inner.state != EngineState::Running {
            return Err(inner.invalid("pause"));
        }
        let Some(countdown) = inner.countdown.as_mut() else {
            return Err(inner.invalid("pause"));
        };

        countdown.pause()?;
        inner.remaining_seconds = countdown.remaining_seconds();
        inner.state = EngineState::Paused;

        tracing::info!(remaining = inner.remaining_seconds, "Session paused");
        self.shared
            .emit(TimerEvent::StateChanged(inner.snapshot()));
        Ok(())
    }

    /// Resumes a paused session.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidTransition`] unless paused.
    pub async fn resume(&self) -> Result<(), TimerError> {
        let mut guard = self.shared.inner.lock().await;
        let inner = &mut *guard;
        if inner.state != EngineState::Paused {
            return Err(inner.invalid("resume"));
        }
        self.resume_locked(inner)
    }

    fn resume_locked(&self, inner: &mut Inner) -> Result<(), TimerError> {
        let Some(countdown) = inner.countdown.as_mut() else {
            return Err(inner.invalid("resume"));
        };

        countdown.resume()?;
        inner.state = EngineState::Running;
        self.shared.resumed.notify_one();

        tracing::info!(remaining = inner.remaining_seconds, "Session resumed");
        self.shared
            .emit(TimerEvent::StateChanged(inner.snapshot()));
        Ok(())
    }

    /// Returns to an idle work session from any state.
    ///
    /// The live countdown is discarded and the advancement loop is stopped and
    /// joined before this returns. The completed-work counter is kept.
    ///
    /// A delivery already running on the dispatcher is allowed to finish first;
    /// every later delivery from the discarded interval is dropped. Calling
    /// this from inside a listener callback therefore deadlocks.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::ShutdownTimeout`] if the loop did not stop within
    /// the configured bound. The engine is reset regardless and no event from
    /// the discarded interval will be delivered.
    pub async fn reset(&self) -> Result<(), TimerError> {
        let (worker, bound) = {
            let mut guard = self.shared.inner.lock().await;
            let inner = &mut *guard;

            let worker = inner.worker.take();
            if let Some(worker) = &worker {
                worker.cancel.cancel();
            }
            if let Some(mut countdown) = inner.countdown.take() {
                countdown.cancel();
            }

            let epoch = self.shared.subscribers.advance_epoch();
            inner.state = EngineState::Idle;
            inner.load_session(SessionType::Work);

            tracing::info!(epoch, "Timer reset");
            self.shared
                .emit(TimerEvent::StateChanged(inner.snapshot()));
            (worker, inner.config.shutdown_timeout())
        };

        let Some(mut worker) = worker else {
            return Ok(());
        };

        match timeout(bound, &mut worker.handle).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Advancement loop ended abnormally");
                Ok(())
            }
            Err(_) => {
                tracing::warn!(?bound, "Advancement loop did not stop in time, aborting");
                worker.handle.abort();
                Err(TimerError::ShutdownTimeout(bound))
            }
        }
    }

    /// Registers a listener for subsequent events.
    pub fn subscribe(&self, listener: Arc<dyn TimerListener>) -> ListenerId {
        let id = self.shared.subscribers.add(listener);
        tracing::debug!(listener = ?id, total = self.shared.subscribers.len(), "Listener subscribed");
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.shared.subscribers.remove(id)
    }

    /// Returns a fresh view of the engine.
    pub async fn current_state(&self) -> EngineSnapshot {
        let mut guard = self.shared.inner.lock().await;
        let inner = &mut *guard;
        if inner.state == EngineState::Running {
            if let Some(countdown) = inner.countdown.as_mut() {
                inner.remaining_seconds = countdown.sample();
            }
        }
        inner.snapshot()
    }

    /// Returns the active configuration.
    pub async fn config(&self) -> TimerConfig {
        self.shared.inner.lock().await.config.clone()
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.shared.shutdown.cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
