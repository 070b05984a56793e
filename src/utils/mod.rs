//! Process-level helpers
//! 
//! Currently only graceful shutdown handling for the service binary.

pub mod signals;

pub use signals::shutdown_signal;
