//! Face configuration, wall-clock time and redraw scheduling

pub mod config;
pub mod scheduler;
pub mod time;
