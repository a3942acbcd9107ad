//! Terminal rendering of timer snapshots

use crate::{
    routes::SESSION_PRESETS_MINUTES,
    state::{TimerPhase, TimerSnapshot},
    utils::{format_clock, progress_bar},
};

/// One status line: clock, bar, phase and the hint for the next action
pub fn render_line(snapshot: &TimerSnapshot, bar_width: usize) -> String {
    let hint = match snapshot.phase {
        TimerPhase::Running => "Enter: pause, q: quit",
        TimerPhase::Paused => "Enter: start, q: quit",
        TimerPhase::Idle | TimerPhase::Finished | TimerPhase::Stopped => "q: quit",
    };

    format!(
        "{} {} {:<8} ({})",
        format_clock(snapshot.remaining_ms),
        progress_bar(snapshot.progress, bar_width),
        snapshot.phase.label(),
        hint
    )
}

/// Snapshot as a single JSON line
pub fn render_json(snapshot: &TimerSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}

/// Time selection menu listing the preset session lengths
pub fn render_presets() -> String {
    let mut menu = String::from("Please select the time\n");
    for minutes in SESSION_PRESETS_MINUTES {
        menu.push_str(&format!("  {} Min  (--route timer/{})\n", minutes, minutes));
    }
    menu
}
