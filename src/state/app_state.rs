//! Timer session state shared between the HTTP layer and the tick task

use std::{
    sync::{Arc, Mutex, Weak},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use super::{ChannelNotifier, CompletionEvent};
use crate::timer::{
    CustomInput, Mode, Phase, Scheduler, TickCallback, TickHandle, TimerConfig, TimerEngine,
    TimerSnapshot,
};

type Engine = TimerEngine<ChannelNotifier>;

/// Result of a timer action: whether it took effect, and the state afterwards
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub changed: bool,
    pub snapshot: TimerSnapshot,
}

/// Owns the timer engine and the single periodic tick registration
pub struct AppState {
    engine: Mutex<Engine>,
    scheduler: Arc<dyn Scheduler>,
    /// At most one registered tick callback at a time
    tick_handle: Mutex<Option<TickHandle>>,
    tick_interval: Duration,
    self_ref: Weak<AppState>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Completion events for alert listeners
    pub completion_tx: broadcast::Sender<CompletionEvent>,
    /// Latest snapshot for display watchers
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create the shared state; ticks are registered on `scheduler` every `tick_interval`
    pub fn new(
        config: TimerConfig,
        tick_interval: Duration,
        scheduler: Arc<dyn Scheduler>,
        host: String,
        port: u16,
    ) -> Arc<Self> {
        let (completion_tx, _) = broadcast::channel(16);
        let engine = TimerEngine::new(config, ChannelNotifier::new(completion_tx.clone()));
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        Arc::new_cyclic(|self_ref| Self {
            engine: Mutex::new(engine),
            scheduler,
            tick_handle: Mutex::new(None),
            tick_interval,
            self_ref: self_ref.clone(),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            completion_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        })
    }

    /// Run an engine operation, keep the tick registration in step with the
    /// phase, and publish the resulting snapshot
    fn apply<F>(&self, action: &str, op: F) -> Result<ActionOutcome, String>
    where
        F: FnOnce(&mut Engine) -> bool,
    {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        let was_running = engine.phase() == Phase::Running;
        let changed = op(&mut *engine);
        let snapshot = engine.snapshot();

        // Registration changes happen under the engine lock so concurrent
        // actions cannot leave a running timer without a ticker
        match (was_running, snapshot.is_running()) {
            (false, true) => self.arm_ticker()?,
            (true, false) => self.disarm_ticker()?,
            _ => {}
        }
        drop(engine);

        if changed && action != "tick" {
            self.record_action(action);
        }

        if let Err(e) = self.snapshot_tx.send(snapshot.clone()) {
            warn!("Failed to send snapshot update: {}", e);
        }

        Ok(ActionOutcome { changed, snapshot })
    }

    fn tick_callback(&self) -> TickCallback {
        let state = self.self_ref.clone();
        Box::new(move || {
            if let Some(state) = state.upgrade() {
                if let Err(e) = state.tick(Utc::now()) {
                    error!("Failed to tick timer: {}", e);
                }
            }
        })
    }

    fn arm_ticker(&self) -> Result<(), String> {
        let mut handle = self.tick_handle.lock()
            .map_err(|e| format!("Failed to lock tick handle: {}", e))?;

        if let Some(previous) = handle.take() {
            self.scheduler.cancel(previous);
        }
        *handle = Some(self.scheduler.schedule(self.tick_interval, self.tick_callback()));
        debug!("Tick registration armed");
        Ok(())
    }

    fn disarm_ticker(&self) -> Result<(), String> {
        let mut handle = self.tick_handle.lock()
            .map_err(|e| format!("Failed to lock tick handle: {}", e))?;

        if let Some(previous) = handle.take() {
            self.scheduler.cancel(previous);
            debug!("Tick registration cancelled");
        }
        Ok(())
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Start the timer, optionally replacing the pending custom input first
    pub fn start(&self, now: DateTime<Utc>, input: Option<CustomInput>) -> Result<ActionOutcome, String> {
        self.apply("start", |engine| {
            if let Some(input) = input {
                engine.set_custom_input(input);
            }
            engine.start(now)
        })
    }

    pub fn pause(&self) -> Result<ActionOutcome, String> {
        self.apply("pause", |engine| engine.pause())
    }

    pub fn resume(&self, now: DateTime<Utc>) -> Result<ActionOutcome, String> {
        self.apply("resume", |engine| engine.resume(now))
    }

    pub fn stop(&self) -> Result<ActionOutcome, String> {
        self.apply("stop", |engine| engine.stop())
    }

    pub fn reset(&self) -> Result<ActionOutcome, String> {
        self.apply("reset", |engine| engine.reset())
    }

    pub fn switch_mode(&self, mode: Mode) -> Result<ActionOutcome, String> {
        self.apply("switch-mode", |engine| engine.switch_mode(mode))
    }

    pub fn set_muted(&self, muted: bool) -> Result<ActionOutcome, String> {
        info!("Setting muted to: {}", muted);
        self.apply(if muted { "mute" } else { "unmute" }, |engine| engine.set_muted(muted))
    }

    /// Recompute the countdown; invoked by the registered tick callback
    pub fn tick(&self, now: DateTime<Utc>) -> Result<ActionOutcome, String> {
        self.apply("tick", |engine| engine.tick(now))
    }

    /// Get current timer snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        self.engine.lock()
            .map(|engine| engine.snapshot())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Subscribe to completion events
    pub fn subscribe_completions(&self) -> broadcast::Receiver<CompletionEvent> {
        self.completion_tx.subscribe()
    }

    /// Whether a tick callback is currently registered
    pub fn ticker_armed(&self) -> bool {
        self.tick_handle.lock().map(|handle| handle.is_some()).unwrap_or(false)
    }

    /// Cancel the tick registration before the session goes away
    pub fn shutdown(&self) -> Result<(), String> {
        info!("Shutting down timer session");
        self.disarm_ticker()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
