//! Completion alert background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{services::play_alarm, state::AppState};

/// Background task that sounds the alarm every time a countdown completes
pub async fn completion_alert_task(state: Arc<AppState>, alarm_command: Option<String>) {
    info!("Starting completion alert task");

    let mut completions = state.subscribe_completions();

    loop {
        match completions.recv().await {
            Ok(event) => {
                info!("Timer complete at {}", event.finished_at);

                if event.muted {
                    info!("Timer is muted, skipping alarm");
                    continue;
                }

                if let Err(e) = play_alarm(alarm_command.as_deref()).await {
                    error!("Failed to play alarm: {}", e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Completion alert task lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Completion channel closed, stopping alert task");
                break;
            }
        }
    }
}
