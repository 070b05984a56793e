//! Read-only view of the timer handed to the display layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CustomInput, Mode, Phase};

/// Immutable copy of the engine state plus derived display values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub phase: Phase,
    pub total_duration: u64,
    pub remaining: u64,
    pub end_timestamp: Option<DateTime<Utc>>,
    pub muted: bool,
    pub custom_input: CustomInput,
    pub committed_custom: Option<u64>,
    pub percent_complete: f64,
    /// Remaining time as `MM:SS`
    pub display: String,
}

impl TimerSnapshot {
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

/// Share of the session already elapsed, in percent
pub fn percent_complete(total_duration: u64, remaining: u64) -> f64 {
    if total_duration == 0 {
        return 0.0;
    }
    let elapsed = total_duration.saturating_sub(remaining);
    elapsed as f64 / total_duration as f64 * 100.0
}

/// Format seconds as zero-padded `MM:SS`
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
