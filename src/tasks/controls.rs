//! Terminal control input task

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc::Sender,
};
use tracing::{debug, info, warn};

/// Command entered by the user while a session is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Start or pause the countdown
    Toggle,
    Quit,
}

/// Map one line of input to a control. Unrecognized input yields `None`.
pub fn parse_control(line: &str) -> Option<Control> {
    match line.trim().to_lowercase().as_str() {
        "" | "p" | "pause" | "s" | "start" | "space" => Some(Control::Toggle),
        "q" | "quit" | "exit" => Some(Control::Quit),
        _ => None,
    }
}

/// Background task that reads stdin line by line and forwards controls
pub async fn control_input_task(tx: Sender<Control>) {
    info!("Starting control input task");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_control(&line) {
                Some(control) => {
                    if tx.send(control).await.is_err() {
                        debug!("Control receiver dropped, stopping input task");
                        break;
                    }
                }
                None => warn!("Unrecognized input: {:?}", line.trim()),
            },
            Ok(None) => {
                debug!("Stdin closed, stopping input task");
                break;
            }
            Err(e) => {
                warn!("Failed to read control input: {}", e);
                break;
            }
        }
    }
}
