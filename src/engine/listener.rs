//! Listener contract and the subscriber registry.
//!
//! Listeners are called from whatever context the engine's [`Dispatcher`]
//! delivers on, never directly from the advancement loop. A listener that
//! returns an error or panics is logged and skipped; delivery to the remaining
//! listeners continues.
//!
//! A delivery in progress holds off a reset until it finishes, so a listener
//! must not call `reset` on its own engine from inside a callback.
//!
//! [`Dispatcher`]: super::Dispatcher

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Result;

use crate::types::{Completed, EngineSnapshot, Tick};

// ============================================================================
// TimerListener
// ============================================================================

/// Receives progress and completion events from a timer engine.
pub trait TimerListener: Send + Sync {
    /// Called for every sample taken while the engine is running.
    fn on_tick(&self, tick: &Tick) -> Result<()>;

    /// Called once when a session runs out.
    fn on_completed(&self, completed: &Completed) -> Result<()>;

    /// Called after start, pause, resume, reset and completion.
    fn on_state_changed(&self, _snapshot: &EngineSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// ============================================================================
// TimerEvent
// ============================================================================

/// Event emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    /// Progress sample
    Tick(Tick),
    /// Session ran out
    Completed(Completed),
    /// Lifecycle change
    StateChanged(EngineSnapshot),
}

impl TimerEvent {
    fn kind(&self) -> &'static str {
        match self {
            TimerEvent::Tick(_) => "tick",
            TimerEvent::Completed(_) => "completed",
            TimerEvent::StateChanged(_) => "state_changed",
        }
    }

    fn deliver_to(&self, listener: &dyn TimerListener) -> Result<()> {
        match self {
            TimerEvent::Tick(tick) => listener.on_tick(tick),
            TimerEvent::Completed(completed) => listener.on_completed(completed),
            TimerEvent::StateChanged(snapshot) => listener.on_state_changed(snapshot),
        }
    }
}

// ============================================================================
// Subscribers
// ============================================================================

/// Registered listeners plus the epoch used to drop stale deliveries.
///
/// The epoch advances on every reset. An event stamped with an older epoch is
/// discarded at delivery time. `gate` is held for reading across a whole
/// delivery and for writing while the epoch advances, so once
/// [`Subscribers::advance_epoch`] returns no older event is mid-delivery.
#[derive(Default)]
pub(crate) struct Subscribers {
    listeners: RwLock<Vec<(ListenerId, Arc<dyn TimerListener>)>>,
    next_id: AtomicU64,
    epoch: AtomicU64,
    gate: RwLock<()>,
}

impl Subscribers {
    pub(crate) fn add(&self, listener: Arc<dyn TimerListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Invalidates every event stamped before this call.
    ///
    /// Blocks until a delivery already in progress has finished.
    pub(crate) fn advance_epoch(&self) -> u64 {
        let _gate = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Delivers `event` to every listener unless its epoch is stale.
    pub(crate) fn deliver(&self, epoch: u64, event: &TimerEvent) {
        let _gate = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        if epoch != self.epoch() {
            tracing::debug!(kind = event.kind(), epoch, "Dropping stale event");
            return;
        }

        let listeners: Vec<_> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        for (id, listener) in listeners {
            match panic::catch_unwind(AssertUnwindSafe(|| event.deliver_to(listener.as_ref()))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(listener = ?id, kind = event.kind(), error = %e, "Listener failed");
                }
                Err(_) => {
                    tracing::error!(listener = ?id, kind = event.kind(), "Listener panicked");
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
