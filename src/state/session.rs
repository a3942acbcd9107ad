//! Owned countdown session
//!
//! A `TimerSession` wraps a [`TimerEngine`] with an observer channel and the
//! background tick loop. The caller owns the session: dropping it (or calling
//! [`TimerSession::shutdown`]) stops the loop, and no tick applies afterwards.
//!
//! Lock order is `inner` then `countdown`. Loops are spawned and registered
//! while `inner` is held, so the registered loop always carries the current
//! epoch.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    engine::{InitOutcome, SurfaceSize, TickOutcome, TimerEngine, Toggle},
    TimerSnapshot,
};
use crate::{error::TimerError, tasks::CountdownLoop};

/// State guarded by one lock so observers never see a torn update
#[derive(Debug, Default)]
struct SessionInner {
    engine: TimerEngine,
    /// Bumped on every running edge; ticks from an older loop are discarded
    epoch: u64,
    started_at: Option<DateTime<Utc>>,
}

/// State shared between the session handle and its tick loop
#[derive(Debug)]
pub(crate) struct SessionShared {
    inner: Mutex<SessionInner>,
    snapshot_tx: watch::Sender<TimerSnapshot>,
}

impl SessionShared {
    /// Apply one tick on behalf of the loop started at `epoch`.
    ///
    /// Returns `None` when that loop has been superseded.
    pub(crate) fn apply_tick(&self, epoch: u64) -> Result<Option<TickOutcome>, TimerError> {
        let mut inner = self.inner.lock()?;
        if inner.epoch != epoch {
            return Ok(None);
        }

        let outcome = inner.engine.tick();
        if outcome != TickOutcome::Ignored {
            self.snapshot_tx.send_replace(inner.engine.snapshot());
        }
        Ok(Some(outcome))
    }
}

pub struct TimerSession {
    shared: Arc<SessionShared>,
    countdown: Mutex<Option<CountdownLoop>>,
}

impl TimerSession {
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(TimerSnapshot::idle());

        Self {
            shared: Arc::new(SessionShared {
                inner: Mutex::new(SessionInner::default()),
                snapshot_tx,
            }),
            countdown: Mutex::new(None),
        }
    }

    /// Initialize the countdown and start ticking. Must run inside a tokio runtime.
    pub fn initialize(&self, total: Duration) -> Result<InitOutcome, TimerError> {
        let total_ms = u64::try_from(total.as_millis()).unwrap_or(u64::MAX);

        let mut inner = self.shared.inner.lock()?;
        let outcome = inner.engine.initialize(total_ms)?;
        if outcome != InitOutcome::Started {
            debug!("Initialize skipped: {:?}", outcome);
            return Ok(outcome);
        }

        inner.epoch += 1;
        inner.started_at = Some(Utc::now());
        self.shared.snapshot_tx.send_replace(inner.engine.snapshot());
        self.start_countdown(inner.epoch)?;
        Ok(outcome)
    }

    /// Pause a running session or resume a paused one.
    ///
    /// A loop is created only on the edge into `Running`, so repeated calls
    /// can never stack two loops on the same session.
    pub fn toggle_running(&self) -> Result<Toggle, TimerError> {
        let mut inner = self.shared.inner.lock()?;
        let toggle = inner.engine.toggle_running();
        if toggle == Toggle::Ignored {
            debug!("Toggle ignored in phase {:?}", inner.engine.phase());
            return Ok(toggle);
        }

        inner.epoch += 1;
        self.shared.snapshot_tx.send_replace(inner.engine.snapshot());
        match toggle {
            Toggle::Started => self.start_countdown(inner.epoch)?,
            _ => self.stop_countdown()?,
        }
        Ok(toggle)
    }

    /// Record the rendering surface's dimensions
    pub fn notify_surface_size(&self, size: SurfaceSize) -> Result<(), TimerError> {
        self.shared.inner.lock()?.engine.notify_surface_size(size);
        Ok(())
    }

    pub fn surface_size(&self) -> Result<SurfaceSize, TimerError> {
        Ok(self.shared.inner.lock()?.engine.surface_size())
    }

    /// Get current timer state
    pub fn snapshot(&self) -> Result<TimerSnapshot, TimerError> {
        Ok(self.shared.inner.lock()?.engine.snapshot())
    }

    /// Subscribe to state changes; the receiver starts at the current snapshot
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    pub fn started_at(&self) -> Result<Option<DateTime<Utc>>, TimerError> {
        Ok(self.shared.inner.lock()?.started_at)
    }

    /// Check whether a tick loop is currently alive
    pub fn has_active_loop(&self) -> Result<bool, TimerError> {
        Ok(self
            .countdown
            .lock()?
            .as_ref()
            .is_some_and(|countdown| !countdown.is_finished()))
    }

    /// Tear the session down: stop the tick loop, invalidate any tick still
    /// in flight and publish a final, non-running snapshot. Later toggles and
    /// initializes are ignored.
    pub fn shutdown(&self) -> Result<(), TimerError> {
        let mut inner = self.shared.inner.lock()?;
        inner.epoch += 1;
        if inner.engine.close() {
            self.shared.snapshot_tx.send_replace(inner.engine.snapshot());
        }
        self.stop_countdown()?;
        info!("Timer session shut down");
        Ok(())
    }

    /// Called with `inner` held
    fn start_countdown(&self, epoch: u64) -> Result<(), TimerError> {
        let countdown = CountdownLoop::spawn(Arc::clone(&self.shared), epoch);
        if let Some(previous) = self.countdown.lock()?.replace(countdown) {
            if !previous.is_finished() {
                warn!("Replacing a countdown loop that was still running");
            }
            previous.cancel();
        }
        Ok(())
    }

    fn stop_countdown(&self) -> Result<(), TimerError> {
        if let Some(countdown) = self.countdown.lock()?.take() {
            countdown.cancel();
        }
        Ok(())
    }
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerSession {
    fn drop(&mut self) {
        let countdown = match self.countdown.get_mut() {
            Ok(slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(countdown) = countdown {
            countdown.cancel();
        }
    }
}
