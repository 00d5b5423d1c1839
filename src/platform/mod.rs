//! Platform abstraction layer
//!
//! Handles the terminal side of the game:
//! - Input events (key codes to game commands)

pub mod input;

pub use input::{Command, direction_from_key, direction_from_key_code, map_key_event, poll_commands};
