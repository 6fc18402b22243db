//! Platform abstraction layer
//!
//! Translates raw browser input (keys, swipes, on-screen buttons) into
//! simulation [`Command`](crate::sim::Command)s. Nothing here touches game
//! state directly.

pub mod input;

pub use input::{SWIPE_THRESHOLD_PX, command_for_key, dpad_commands, swipe_command};
