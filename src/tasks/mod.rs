//! Background tasks module
//!
//! This module contains the tasks that run alongside a timer session.

pub mod controls;
pub mod countdown;

// Re-export main types
pub use controls::{control_input_task, parse_control, Control};
pub use countdown::CountdownLoop;
