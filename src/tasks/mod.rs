//! Background tasks module
//! 
//! This module contains the tick scheduler and the tasks that run alongside
//! the HTTP server.

pub mod completion_alert;
pub mod ticker;

// Re-export main types
pub use completion_alert::completion_alert_task;
pub use ticker::TokioScheduler;
