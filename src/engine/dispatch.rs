//! Event dispatch onto the listener's execution context.
//!
//! The engine never calls listener code from its advancement loop. It hands a
//! [`Delivery`] to a [`Dispatcher`], which must run deliveries asynchronously
//! and in the order they were dispatched.
//!
//! Two implementations are provided:
//! - [`ThreadDispatcher`]: runs deliveries on a dedicated thread
//! - [`QueueDispatcher`]: queues deliveries for a caller-owned context (a UI
//!   loop, for instance) that drains them with [`DeliveryQueue::run_pending`]

use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};

/// A unit of listener work produced by the engine.
pub type Delivery = Box<dyn FnOnce() + Send + 'static>;

/// Delivers engine events to listeners.
///
/// Implementations must not run the delivery inline and must preserve the
/// order in which deliveries are dispatched.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, delivery: Delivery);
}

// ============================================================================
// ThreadDispatcher
// ============================================================================

/// Runs deliveries one at a time on a dedicated background thread.
///
/// The thread exits once the dispatcher is dropped and the backlog drained.
pub struct ThreadDispatcher {
    tx: Sender<Delivery>,
}

impl ThreadDispatcher {
    /// Spawns the delivery thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn() -> std::io::Result<Self> {
        let (tx, rx) = unbounded::<Delivery>();
        thread::Builder::new()
            .name("timer-events".to_string())
            .spawn(move || {
                for delivery in rx {
                    delivery();
                }
                tracing::debug!("Event delivery thread finished");
            })?;
        Ok(Self { tx })
    }
}

impl Dispatcher for ThreadDispatcher {
    fn dispatch(&self, delivery: Delivery) {
        if self.tx.send(delivery).is_err() {
            tracing::warn!("Event delivery thread is gone, dropping event");
        }
    }
}

// ============================================================================
// QueueDispatcher
// ============================================================================

/// Queues deliveries for a context that drains them itself.
#[derive(Clone)]
pub struct QueueDispatcher {
    tx: Sender<Delivery>,
}

/// Receiving side of a [`QueueDispatcher`].
pub struct DeliveryQueue {
    rx: Receiver<Delivery>,
}

impl QueueDispatcher {
    /// Creates a dispatcher and the queue its deliveries land in.
    pub fn new() -> (Self, DeliveryQueue) {
        let (tx, rx) = unbounded();
        (Self { tx }, DeliveryQueue { rx })
    }
}

impl Dispatcher for QueueDispatcher {
    fn dispatch(&self, delivery: Delivery) {
        if self.tx.send(delivery).is_err() {
            tracing::warn!("Delivery queue was dropped, dropping event");
        }
    }
}

impl DeliveryQueue {
    /// Runs every delivery currently queued. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut count = 0;
        while let Ok(delivery) = self.rx.try_recv() {
            delivery();
            count += 1;
        }
        count
    }

    /// Number of deliveries waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
