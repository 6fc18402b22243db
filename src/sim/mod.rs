//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick moves the snake exactly one cell
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod game;
pub mod grid;
pub mod particles;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use game::{BurstConfig, Command, Game, cell_center};
pub use grid::{Direction, Grid, Position};
pub use particles::{Particle, ParticleSystem};
pub use scheduler::{FrameReport, FrameScheduler};
pub use state::{
    Collision, GameEvent, GamePhase, Session, SessionSummary, Snake, SoundEffect, Tuning,
};
pub use tick::{TickOutcome, place_food, tick};
