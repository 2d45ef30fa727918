//! Loopwalk terminal host.
//!
//! Maps key presses onto playthrough commands, stands in for the video
//! player by letting the user end scenes by hand, and prints what the engine
//! asks for.

pub mod config;
pub mod error;
pub mod host;
pub mod keymap;
pub mod state;
