//! Scene building
//!
//! Turns a read-only view of the [`Game`] into triangles in board pixel
//! space (origin top-left, y down). No GPU access, so the draw order and
//! styling can be checked in tests.

use glam::Vec2;

use super::shapes::{centered_square, circle, quad};
use super::vertex::{Vertex, colors, rgb_hex};
use crate::sim::{Game, Particle, Position, Session};

/// Edge length of a particle square in pixels
const PARTICLE_SIZE: f32 = 4.0;
/// Food pulse angular speed (rad/s)
const FOOD_PULSE_RATE: f32 = 4.8;
const EYE_SEGMENTS: u32 = 8;

/// Build every vertex for one frame: grid, particles, snake, food
pub fn build_scene(game: &Game, cell: f32, time_secs: f32) -> Vec<Vertex> {
    let grid = game.grid();
    let mut out = Vec::with_capacity(grid.area() / 4 * 6);

    grid_lines(&mut out, grid.cols(), grid.rows(), cell);
    for particle in game.particles().particles() {
        particle_quad(&mut out, particle, cell);
    }
    if let Some(session) = game.session() {
        snake(&mut out, session, cell);
        food(&mut out, session.food, cell, time_secs);
    }
    out
}

/// Board size in pixels for a grid and cell size
pub fn board_size(game: &Game, cell: f32) -> (f32, f32) {
    let grid = game.grid();
    (grid.cols() as f32 * cell, grid.rows() as f32 * cell)
}

fn grid_lines(out: &mut Vec<Vertex>, cols: i32, rows: i32, cell: f32) {
    let width = cols as f32 * cell;
    let height = rows as f32 * cell;
    let thickness = 0.5;
    for c in 0..=cols {
        let x = c as f32 * cell - thickness / 2.0;
        quad(out, Vec2::new(x, 0.0), Vec2::new(thickness, height), colors::GRID_LINE);
    }
    for r in 0..=rows {
        let y = r as f32 * cell - thickness / 2.0;
        quad(out, Vec2::new(0.0, y), Vec2::new(width, thickness), colors::GRID_LINE);
    }
}

fn particle_quad(out: &mut Vec<Vertex>, particle: &Particle, cell: f32) {
    let color = rgb_hex(particle.color, particle.life);
    centered_square(out, particle.pos * cell, PARTICLE_SIZE / 2.0, color);
}

fn snake(out: &mut Vec<Vertex>, session: &Session, cell: f32) {
    let len = session.snake.len() as f32;
    for (i, segment) in session.snake.segments().enumerate() {
        // Fade from bright cyan at the head towards the tail
        let t = i as f32 / len;
        let brightness = 1.0 - t * 0.4;
        let alpha = 1.0 - t * 0.5;
        let min = cell_origin(*segment, cell) + Vec2::ONE;
        quad(out, min, Vec2::splat(cell - 2.0), [0.0, brightness, brightness, alpha]);

        if i == 0 {
            let origin = cell_origin(*segment, cell);
            circle(out, origin + Vec2::new(5.0, 5.0), 2.0, colors::SNAKE_EYE, EYE_SEGMENTS);
            circle(out, origin + Vec2::new(cell - 5.0, 5.0), 2.0, colors::SNAKE_EYE, EYE_SEGMENTS);
        }
    }
}

fn food(out: &mut Vec<Vertex>, pos: Position, cell: f32, time_secs: f32) {
    let pulse = (time_secs * FOOD_PULSE_RATE).sin();
    let scale = 0.85 + pulse * 0.1;
    let half = (cell / 2.0 - 1.0) * scale;
    let center = cell_origin(pos, cell) + Vec2::splat(cell / 2.0);
    let glow = 18.0 + pulse * 10.0;

    centered_square(out, center, half + glow / 4.0, rgb_hex(colors::FOOD, colors::FOOD_GLOW_ALPHA));
    centered_square(out, center, half, rgb_hex(colors::FOOD, 1.0));
    quad(
        out,
        center + Vec2::new(-half + 2.0, -half + 2.0),
        Vec2::new(half - 2.0, half - 4.0),
        colors::FOOD_HIGHLIGHT,
    );
}

fn cell_origin(pos: Position, cell: f32) -> Vec2 {
    Vec2::new(pos.x as f32 * cell, pos.y as f32 * cell)
}
