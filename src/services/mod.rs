//! External service module
//! 
//! This module contains the side-effecting services the timer drives,
//! currently the completion alarm.

pub mod alarm;

// Re-export main functions
pub use alarm::play_alarm;
