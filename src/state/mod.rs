//! State management module
//!
//! This module contains the countdown state machine, the observable snapshot
//! it publishes, and the session that owns both.

pub mod engine;
pub mod session;
pub mod timer_state;

// Re-export main types
pub use engine::{InitOutcome, SurfaceSize, TickOutcome, TimerEngine, Toggle, TICK_STEP_MS};
pub use session::TimerSession;
pub use timer_state::{TimerPhase, TimerSnapshot};
