//! Neon Snake - a grid Snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state, particles)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Input mapping from keys, swipes and buttons to commands
//! - `highscores`: Best-score persistence
//! - `settings`: Player preferences and tuning

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::{HighScoreStore, MemoryStore, StoreError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Cell edge in CSS pixels
    pub const CELL_SIZE_PX: f32 = 20.0;
    /// Largest board edge in CSS pixels
    pub const MAX_BOARD_PX: f32 = 500.0;
    /// Smallest board edge in cells: room for the spawn snake plus food
    pub const MIN_BOARD_CELLS: i32 = 3;

    /// Ticks per second at the start of a session
    pub const START_SPEED: f32 = 7.0;
    /// Ticks per second added per food eaten
    pub const SPEED_STEP: f32 = 0.25;

    /// Random probes before food placement falls back to a linear scan
    pub const FOOD_PLACEMENT_ATTEMPTS: u32 = 64;

    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 8;
    /// Frame deltas are clamped to this (tab switches, debugger pauses)
    pub const MAX_FRAME_DT_MS: f64 = 250.0;

    /// Particle tuning, in cell units per frame
    pub const PARTICLE_MIN_SPEED: f32 = 0.05;
    pub const PARTICLE_MAX_SPEED: f32 = 0.2;
    pub const PARTICLE_GRAVITY: f32 = 0.005;
    pub const PARTICLE_DECAY: f32 = 0.9;
    /// Particles fading below this are removed
    pub const PARTICLE_MIN_LIFE: f32 = 0.01;

    pub const CONSUME_BURST: usize = 12;
    pub const DEATH_BURST: usize = 20;
    pub const CONSUME_COLOR: u32 = 0xff00ff;
    pub const DEATH_COLOR: u32 = 0xff0066;
}
