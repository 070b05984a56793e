//! Timer modes, lifecycle phases and duration configuration

use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

/// Duration preset governing the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Work,
    ShortBreak,
    LongBreak,
    /// Duration is supplied by the user when the session starts
    Custom,
}

impl Mode {
    /// Kebab-case name used in the HTTP API and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::ShortBreak => "short-break",
            Mode::LongBreak => "long-break",
            Mode::Custom => "custom",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "work" => Ok(Mode::Work),
            "short-break" | "short" => Ok(Mode::ShortBreak),
            "long-break" | "long" => Ok(Mode::LongBreak),
            "custom" => Ok(Mode::Custom),
            other => Err(format!("Unknown timer mode: {}", other)),
        }
    }
}

/// Lifecycle of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Configured durations of the fixed modes, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub work: u64,
    pub short_break: u64,
    pub long_break: u64,
}

impl TimerConfig {
    /// Build a configuration from durations given in minutes, saturating on overflow
    pub fn from_minutes(work: u64, short_break: u64, long_break: u64) -> Self {
        Self {
            work: work.saturating_mul(60),
            short_break: short_break.saturating_mul(60),
            long_break: long_break.saturating_mul(60),
        }
    }

    /// Configured duration of a fixed mode; `None` for Custom
    pub fn duration_of(&self, mode: Mode) -> Option<u64> {
        match mode {
            Mode::Work => Some(self.work),
            Mode::ShortBreak => Some(self.short_break),
            Mode::LongBreak => Some(self.long_break),
            Mode::Custom => None,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::from_minutes(25, 5, 15)
    }
}
