//! Error types for the timer library

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Session duration must be positive, got {0} ms")]
    InvalidDuration(u64),

    #[error("Session duration of {0} minutes is out of range")]
    DurationOutOfRange(u64),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Failed to lock timer state: {0}")]
    StatePoisoned(String),
}

impl<T> From<std::sync::PoisonError<T>> for TimerError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        TimerError::StatePoisoned(e.to_string())
    }
}
