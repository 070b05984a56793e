//! Periodic tick source abstraction

use std::time::Duration;

/// Callback invoked on every scheduled tick
pub type TickCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Opaque handle to a registered periodic callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Facility that invokes a callback at a fixed cadence until cancelled
pub trait Scheduler: Send + Sync {
    /// Register `callback` to run every `interval`
    fn schedule(&self, interval: Duration, callback: TickCallback) -> TickHandle;

    /// Stop a registered callback; unknown handles are ignored
    fn cancel(&self, handle: TickHandle);
}
