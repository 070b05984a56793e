//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::timer::TimerConfig;

/// Longest accepted preset, one day
pub const MAX_PRESET_MINUTES: u64 = 24 * 60;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-timer")]
#[command(about = "A drift-corrected Pomodoro countdown timer served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Work session length in minutes
    #[arg(long, default_value = "25", value_parser = clap::value_parser!(u64).range(1..=MAX_PRESET_MINUTES))]
    pub work_minutes: u64,

    /// Short break length in minutes
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..=MAX_PRESET_MINUTES))]
    pub short_break_minutes: u64,

    /// Long break length in minutes
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u64).range(1..=MAX_PRESET_MINUTES))]
    pub long_break_minutes: u64,

    /// Tick interval in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Command to run when a countdown completes (rings the terminal bell if unset)
    #[arg(long)]
    pub alarm_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Durations of the fixed timer modes
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::from_minutes(self.work_minutes, self.short_break_minutes, self.long_break_minutes)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
