//! Timer engine for the Pomodoro Timer.
//!
//! This module contains the timing core:
//! - `countdown`: drift-free remaining-time accounting for one interval
//! - `scheduler`: which session follows a completed one
//! - `timer`: the engine facade and its background advancement loop
//! - `listener`: the listener contract and subscriber registry
//! - `dispatch`: delivery of events onto the listener's context

pub mod countdown;
pub mod dispatch;
mod error;
pub mod listener;
pub mod scheduler;
pub mod timer;

pub use countdown::Countdown;
pub use dispatch::{Delivery, DeliveryQueue, Dispatcher, QueueDispatcher, ThreadDispatcher};
pub use error::TimerError;
pub use listener::{ListenerId, TimerEvent, TimerListener};
pub use scheduler::SessionScheduler;
pub use timer::TimerEngine;
