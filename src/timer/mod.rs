//! Timer core module
//!
//! This module contains the countdown state machine and the types it exposes
//! to the scheduling and display layers.

pub mod custom;
pub mod engine;
pub mod mode;
pub mod scheduler;
pub mod snapshot;

// Re-export main types
pub use custom::CustomInput;
pub use engine::{Notifier, TimerEngine};
pub use mode::{Mode, Phase, TimerConfig};
pub use scheduler::{Scheduler, TickCallback, TickHandle};
pub use snapshot::{format_clock, TimerSnapshot};
