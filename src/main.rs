//! Meditation Timer - a countdown session with pause/resume and observable progress
//!
//! This is the terminal front end: it opens the requested screen, renders the
//! countdown on every state change and forwards start/pause input.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use meditation_timer::{
    config::Config,
    display::{render_json, render_line, render_presets},
    state::{SurfaceSize, TimerSession, TimerSnapshot},
    tasks::{control_input_task, Control},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so the countdown owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(format!("meditation_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    if config.list_presets {
        print!("{}", render_presets());
        return Ok(());
    }

    let route = config.route()?;
    let Some(duration) = route.session_duration()? else {
        info!("Opening {} screen", route);
        print!("{}", render_presets());
        return Ok(());
    };

    info!("Starting meditation session: route={}, duration={}s", route, duration.as_secs());

    let session = TimerSession::new();
    session.notify_surface_size(SurfaceSize::new(u32::from(config.bar_width), 1))?;
    let mut snapshots = session.subscribe();
    session.initialize(duration)?;

    let (control_tx, mut control_rx) = mpsc::channel(8);
    let input_task = tokio::spawn(control_input_task(control_tx));

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut signals_live = true;
    let mut last_line = String::new();

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    warn!("Timer session closed its snapshot channel");
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                present(&session, &snapshot, config.json, &mut last_line);
                if snapshot.is_finished() {
                    info!("Meditation session complete");
                    break;
                }
            }

            Some(control) = control_rx.recv() => match control {
                Control::Toggle => {
                    if let Err(e) = session.toggle_running() {
                        error!("Failed to toggle timer: {}", e);
                    }
                }
                Control::Quit => {
                    info!("Quit requested");
                    break;
                }
            },

            result = &mut shutdown, if signals_live => match result {
                Ok(()) => {
                    info!("Shutdown signal received");
                    break;
                }
                Err(e) => {
                    error!("Failed to install signal handler: {}", e);
                    signals_live = false;
                }
            },
        }
    }

    if let Ok(Some(started_at)) = session.started_at() {
        info!("Session that started at {} has ended", started_at.format("%H:%M:%S"));
    }
    session.shutdown()?;
    input_task.abort();

    Ok(())
}

/// Print a snapshot. Text lines are only repeated when they change on screen.
fn present(session: &TimerSession, snapshot: &TimerSnapshot, json: bool, last_line: &mut String) {
    if json {
        match render_json(snapshot) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to serialize snapshot: {}", e),
        }
        return;
    }

    let width = session
        .surface_size()
        .map(|size| size.width as usize)
        .unwrap_or_default();
    let line = render_line(snapshot, width);
    if line != *last_line {
        println!("{}", line);
        *last_line = line;
    }
}
