//! Observable timer state published to renderers

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a countdown session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// No session has been initialized yet
    Idle,
    Running,
    /// Stopped with time left, resumable
    Paused,
    /// Countdown reached zero; a new session may be initialized
    Finished,
    /// Session torn down by its owner, terminal
    Stopped,
}

impl TimerPhase {
    pub fn label(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "Idle",
            TimerPhase::Running => "Running",
            TimerPhase::Paused => "Paused",
            TimerPhase::Finished => "Finished",
            TimerPhase::Stopped => "Stopped",
        }
    }
}

/// Consistent view of a session, taken under a single lock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub total_ms: u64,
    pub remaining_ms: u64,
    /// Fraction of time remaining, in `[0.0, 1.0]`
    pub progress: f32,
    pub running: bool,
    pub phase: TimerPhase,
}

impl TimerSnapshot {
    /// Snapshot of a timer that has not been initialized
    pub fn idle() -> Self {
        Self {
            total_ms: 0,
            remaining_ms: 0,
            progress: 0.0,
            running: false,
            phase: TimerPhase::Idle,
        }
    }

    /// Check if the countdown is actively decrementing
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.phase == TimerPhase::Finished
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}
