//! Input mapping
//!
//! Keyboard, swipe and d-pad input all reduce to the same three commands.

use crate::sim::{Command, Direction};

/// Touch movement below this on both axes counts as a tap
pub const SWIPE_THRESHOLD_PX: f32 = 10.0;

/// Map a `KeyboardEvent.key` value to a command
pub fn command_for_key(key: &str) -> Option<Command> {
    let command = match key {
        "ArrowUp" | "w" | "W" => Command::SetDirection(Direction::Up),
        "ArrowDown" | "s" | "S" => Command::SetDirection(Direction::Down),
        "ArrowLeft" | "a" | "A" => Command::SetDirection(Direction::Left),
        "ArrowRight" | "d" | "D" => Command::SetDirection(Direction::Right),
        "p" | "P" | "Escape" => Command::TogglePause,
        "Enter" | " " => Command::StartOrRetry,
        _ => return None,
    };
    Some(command)
}

/// Classify a finished touch by its displacement (screen y grows downward).
///
/// Short touches are taps and start a session; otherwise the dominant axis
/// picks the direction.
pub fn swipe_command(dx: f32, dy: f32) -> Command {
    if dx.abs() < SWIPE_THRESHOLD_PX && dy.abs() < SWIPE_THRESHOLD_PX {
        return Command::StartOrRetry;
    }
    let dir = if dx.abs() > dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Command::SetDirection(dir)
}

/// A d-pad press starts a session when idle, then steers
pub fn dpad_commands(dir: Direction) -> [Command; 2] {
    [Command::StartOrRetry, Command::SetDirection(dir)]
}
