//! Meditation Timer - a countdown session with pause/resume and observable progress
//!
//! The core is [`TimerEngine`], a countdown state machine stepped in 100 ms
//! ticks. [`TimerSession`] owns an engine, drives it from a background tokio
//! task and publishes every change as a [`TimerSnapshot`] for renderers.

pub mod config;
pub mod display;
pub mod error;
pub mod routes;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use routes::Route;
pub use state::{TimerEngine, TimerPhase, TimerSession, TimerSnapshot};
pub use utils::signals::shutdown_signal;
