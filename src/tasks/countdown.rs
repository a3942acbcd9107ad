//! Countdown tick loop background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::{
    engine::{TickOutcome, TICK_STEP_MS},
    session::SessionShared,
};

/// Handle to a running tick loop. Dropping it aborts the loop.
#[derive(Debug)]
pub struct CountdownLoop {
    cancel_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl CountdownLoop {
    /// Spawn a loop that ticks the session every step on behalf of `epoch`
    pub(crate) fn spawn(shared: Arc<SessionShared>, epoch: u64) -> Self {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let handle = tokio::spawn(countdown_task(shared, epoch, cancel_rx));

        Self {
            cancel_tx: Some(cancel_tx),
            handle,
        }
    }

    /// Signal the loop to stop and abort it if it is mid-wait
    pub fn cancel(mut self) {
        self.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    fn stop(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            // The loop may already have exited on its own
            let _ = cancel_tx.send(());
        }
        self.handle.abort();
    }
}

impl Drop for CountdownLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Background task that advances the countdown until it finishes, is paused or is cancelled
async fn countdown_task(shared: Arc<SessionShared>, epoch: u64, mut cancel_rx: oneshot::Receiver<()>) {
    debug!("Starting countdown loop (epoch {})", epoch);

    let step = Duration::from_millis(TICK_STEP_MS);
    let mut interval = interval_at(Instant::now() + step, step);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = &mut cancel_rx => {
                debug!("Countdown loop cancelled (epoch {})", epoch);
                break;
            }

            _ = interval.tick() => {
                match shared.apply_tick(epoch) {
                    Ok(Some(TickOutcome::Advanced)) => {}
                    Ok(Some(TickOutcome::Finished)) => {
                        info!("Countdown reached zero");
                        break;
                    }
                    Ok(Some(TickOutcome::Ignored)) => {
                        debug!("Timer no longer running, stopping countdown loop");
                        break;
                    }
                    Ok(None) => {
                        debug!("Countdown loop superseded (epoch {})", epoch);
                        break;
                    }
                    Err(e) => {
                        error!("Failed to apply countdown tick: {}", e);
                        break;
                    }
                }
            }
        }
    }
}
