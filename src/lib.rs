//! Pomodoro Timer - A drift-corrected countdown timer
//! 
//! This library provides the timer state machine together with the pieces
//! that drive it as a service: a tokio tick scheduler, a completion alarm and
//! a small HTTP control API.

pub mod config;
pub mod timer;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use timer::{Mode, Phase, TimerConfig, TimerEngine, TimerSnapshot};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
