use std::any::Any;

use gloo_timers::callback::{Interval, Timeout};

/// Owns a scheduled callback; dropping it cancels the callback.
pub struct TimerHandle {
    _inner: Box<dyn Any>,
}

impl TimerHandle {
    pub fn new<T: Any>(inner: T) -> Self {
        Self {
            _inner: Box::new(inner),
        }
    }

    /// Lets the callback run to completion without keeping the handle.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TimerHandle")
    }
}

pub trait Scheduler {
    fn interval(&self, millis: u32, tick: Box<dyn FnMut()>) -> TimerHandle;
    fn timeout(&self, millis: u32, done: Box<dyn FnOnce()>) -> TimerHandle;
}

/// `setInterval`/`setTimeout` through gloo; both cancel on drop.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn interval(&self, millis: u32, tick: Box<dyn FnMut()>) -> TimerHandle {
        TimerHandle::new(Interval::new(millis, tick))
    }

    fn timeout(&self, millis: u32, done: Box<dyn FnOnce()>) -> TimerHandle {
        TimerHandle::new(Timeout::new(millis, done))
    }
}
