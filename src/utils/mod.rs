//! Utility functions module
//!
//! This module contains signal handling and display formatting helpers.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::{format_clock, progress_bar};
pub use signals::shutdown_signal;
