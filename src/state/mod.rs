//! State management module
//! 
//! This module contains the shared timer session and its completion notifier.

pub mod app_state;
pub mod notifier;

// Re-export main types
pub use app_state::{ActionOutcome, AppState};
pub use notifier::{ChannelNotifier, CompletionEvent};
