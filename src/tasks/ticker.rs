//! Tokio-backed periodic tick scheduler

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::timer::{Scheduler, TickCallback, TickHandle};

/// Scheduler running each registered callback on its own interval task
#[derive(Debug)]
pub struct TokioScheduler {
    runtime: Handle,
    next_id: AtomicU64,
    tasks: Mutex<HashMap<u64, JoinHandle<()>>>,
}

impl TokioScheduler {
    /// Create a scheduler spawning its tasks on the given runtime
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Number of callbacks currently registered
    pub fn active_count(&self) -> usize {
        self.tasks.lock().map(|tasks| tasks.len()).unwrap_or(0)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, period: Duration, callback: TickCallback) -> TickHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let task = self.runtime.spawn(async move {
            // First tick lands one full period after scheduling
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                callback();
            }
        });

        match self.tasks.lock() {
            Ok(mut tasks) => {
                tasks.insert(id, task);
            }
            Err(e) => {
                warn!("Failed to register tick task {}: {}", id, e);
                task.abort();
            }
        }

        debug!("Scheduled tick task {} every {:?}", id, period);
        TickHandle::new(id)
    }

    fn cancel(&self, handle: TickHandle) {
        let task = match self.tasks.lock() {
            Ok(mut tasks) => tasks.remove(&handle.id()),
            Err(e) => {
                warn!("Failed to lock tick tasks: {}", e);
                None
            }
        };

        if let Some(task) = task {
            task.abort();
            debug!("Cancelled tick task {}", handle.id());
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        if let Ok(mut tasks) = self.tasks.lock() {
            for (_, task) in tasks.drain() {
                task.abort();
            }
        }
    }
}
