//! Countdown state machine
//!
//! `TimerEngine` holds the session's total duration, remaining time and
//! running flag. It has no notion of wall-clock time: the caller drives it
//! by invoking [`TimerEngine::tick`] every [`TICK_STEP_MS`] while it runs.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{TimerPhase, TimerSnapshot};
use crate::error::TimerError;

/// Amount of time removed from the countdown on every tick
pub const TICK_STEP_MS: u64 = 100;

/// Dimensions of the surface the timer is rendered on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Result of [`TimerEngine::initialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A new session was created and is running
    Started,
    /// A running or paused session exists; nothing changed
    AlreadyActive,
    /// The engine was torn down and accepts no new session
    Closed,
}

/// Result of [`TimerEngine::toggle_running`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Transitioned into `Running`; a tick loop must be started
    Started,
    /// Transitioned into `Paused`; the tick loop must stop
    Paused,
    /// Idle, finished or torn-down session, nothing changed
    Ignored,
}

/// Result of [`TimerEngine::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced,
    /// Remaining time reached zero on this tick
    Finished,
    /// The engine was not running
    Ignored,
}

#[derive(Debug, Default)]
pub struct TimerEngine {
    total_ms: Option<NonZeroU64>,
    remaining_ms: u64,
    running: bool,
    closed: bool,
    surface: SurfaceSize,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session of `total_ms` milliseconds.
    ///
    /// While a session is running or paused, later calls leave it untouched
    /// so a redundant invocation cannot reset a countdown in progress. A
    /// finished session can be replaced by a new one.
    pub fn initialize(&mut self, total_ms: u64) -> Result<InitOutcome, TimerError> {
        let total = NonZeroU64::new(total_ms).ok_or(TimerError::InvalidDuration(total_ms))?;

        match self.phase() {
            TimerPhase::Idle | TimerPhase::Finished => {}
            TimerPhase::Running | TimerPhase::Paused => {
                debug!("Ignoring initialize({}), session already active", total_ms);
                return Ok(InitOutcome::AlreadyActive);
            }
            TimerPhase::Stopped => {
                debug!("Ignoring initialize({}), engine torn down", total_ms);
                return Ok(InitOutcome::Closed);
            }
        }

        self.total_ms = Some(total);
        self.remaining_ms = total.get();
        self.running = true;
        info!("Timer session initialized for {} ms", total_ms);
        Ok(InitOutcome::Started)
    }

    /// Flip between running and paused. An idle, finished or torn-down session is left alone.
    pub fn toggle_running(&mut self) -> Toggle {
        match self.phase() {
            TimerPhase::Idle | TimerPhase::Finished | TimerPhase::Stopped => Toggle::Ignored,
            TimerPhase::Running => {
                self.running = false;
                info!("Timer paused with {} ms remaining", self.remaining_ms);
                Toggle::Paused
            }
            TimerPhase::Paused => {
                self.running = true;
                info!("Timer resumed with {} ms remaining", self.remaining_ms);
                Toggle::Started
            }
        }
    }

    /// Remove one step from the countdown
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }

        self.remaining_ms = self.remaining_ms.saturating_sub(TICK_STEP_MS);
        if self.remaining_ms == 0 {
            self.running = false;
            info!("Timer session finished");
            TickOutcome::Finished
        } else {
            TickOutcome::Advanced
        }
    }

    /// Tear the engine down: stop counting and refuse any later start.
    ///
    /// Returns `false` if it was already torn down.
    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.running = false;
        info!("Timer engine closed with {} ms remaining", self.remaining_ms);
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn notify_surface_size(&mut self, size: SurfaceSize) {
        debug!("Surface size changed to {}x{}", size.width, size.height);
        self.surface = size;
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.surface
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms.map_or(0, NonZeroU64::get)
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fraction of the session remaining; always derived from `remaining / total`.
    pub fn progress(&self) -> f32 {
        match self.total_ms {
            Some(total) => (self.remaining_ms as f64 / total.get() as f64).clamp(0.0, 1.0) as f32,
            None => 0.0,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        match self.total_ms {
            _ if self.closed => TimerPhase::Stopped,
            None => TimerPhase::Idle,
            Some(_) if self.running => TimerPhase::Running,
            Some(_) if self.remaining_ms == 0 => TimerPhase::Finished,
            Some(_) => TimerPhase::Paused,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            total_ms: self.total_ms(),
            remaining_ms: self.remaining_ms,
            progress: self.progress(),
            running: self.running,
            phase: self.phase(),
        }
    }
}
