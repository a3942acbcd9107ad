//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::{
    error::TimerError,
    routes::{Route, DEFAULT_SESSION_MINUTES},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "meditation-timer")]
#[command(about = "A meditation countdown timer with pause and resume")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Session length in minutes
    #[arg(short, long, default_value_t = DEFAULT_SESSION_MINUTES)]
    pub minutes: u64,

    /// Open a screen by route instead (home, timer, timer/{minutes})
    #[arg(short, long)]
    pub route: Option<String>,

    /// Width of the progress bar in characters
    #[arg(short, long, default_value = "30")]
    pub bar_width: u16,

    /// Print one JSON snapshot per line instead of the text display
    #[arg(long)]
    pub json: bool,

    /// List the preset session lengths and exit
    #[arg(long)]
    pub list_presets: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Screen to open; `--route` wins over `--minutes`
    pub fn route(&self) -> Result<Route, TimerError> {
        match &self.route {
            Some(path) => path.parse(),
            None => Ok(Route::timer(self.minutes)),
        }
    }

    /// Countdown length requested on the command line, if a timer screen was requested
    pub fn session_duration(&self) -> Result<Option<Duration>, TimerError> {
        self.route()?.session_duration()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
