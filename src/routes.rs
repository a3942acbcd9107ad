//! Screen routes and session duration presets
//!
//! Routes use the same paths as the app's navigation graph: `home`, `timer`
//! for the time selection screen, and `timer/{minutes}` for a countdown.

use std::{fmt, str::FromStr, time::Duration};

use crate::error::TimerError;

/// Session lengths offered on the time selection screen, in minutes
pub const SESSION_PRESETS_MINUTES: [u64; 2] = [3, 10];

/// Used when a timer route carries no usable minutes value
pub const DEFAULT_SESSION_MINUTES: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    SelectTime,
    Timer { minutes: u64 },
}

impl Route {
    pub fn timer(minutes: u64) -> Self {
        Route::Timer { minutes }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "home".to_string(),
            Route::SelectTime => "timer".to_string(),
            Route::Timer { minutes } => format!("timer/{}", minutes),
        }
    }

    /// Duration of the countdown this route opens, if it opens one.
    ///
    /// Zero minutes is rejected here so it never reaches the engine.
    pub fn session_duration(&self) -> Result<Option<Duration>, TimerError> {
        match self {
            Route::Timer { minutes } => minutes_to_duration(*minutes).map(Some),
            _ => Ok(None),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim().trim_matches('/');
        match path.split_once('/') {
            None if path == "home" => Ok(Route::Home),
            None if path == "timer" => Ok(Route::SelectTime),
            Some(("timer", minutes)) if !minutes.contains('/') => Ok(Route::Timer {
                minutes: minutes.parse().unwrap_or(DEFAULT_SESSION_MINUTES),
            }),
            _ => Err(TimerError::UnknownRoute(s.to_string())),
        }
    }
}

/// Convert a session length in minutes into a positive duration
pub fn minutes_to_duration(minutes: u64) -> Result<Duration, TimerError> {
    if minutes == 0 {
        return Err(TimerError::InvalidDuration(0));
    }
    minutes
        .checked_mul(60_000)
        .map(Duration::from_millis)
        .ok_or(TimerError::DurationOutOfRange(minutes))
}
