//! Completion notifier publishing onto a broadcast channel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::timer::Notifier;

/// Emitted once every time a countdown reaches zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub muted: bool,
    pub finished_at: DateTime<Utc>,
}

/// Notifier forwarding completions to every subscribed listener
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: broadcast::Sender<CompletionEvent>,
}

impl ChannelNotifier {
    pub fn new(tx: broadcast::Sender<CompletionEvent>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify_complete(&mut self, muted: bool) {
        let event = CompletionEvent {
            muted,
            finished_at: Utc::now(),
        };
        if self.tx.send(event).is_err() {
            debug!("Completion event dropped, no listeners subscribed");
        }
    }
}
