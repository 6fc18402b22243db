//! Fixed-step simulation tick
//!
//! One call to [`tick`] moves the snake exactly one cell. Collisions are
//! checked before anything is mutated, so a colliding tick leaves the
//! session untouched.

use rand::Rng;

use super::grid::{Grid, Position};
use super::state::{Collision, Session, Snake, Tuning};
use crate::consts::FOOD_PLACEMENT_ATTEMPTS;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Head advanced, tail followed
    Moved,
    /// Head landed on food at `at`; the snake grew by one
    Ate { at: Position },
    /// Nothing moved
    Collided(Collision),
}

/// Advance the session by one step
pub fn tick<R: Rng>(session: &mut Session, grid: &Grid, tuning: &Tuning, rng: &mut R) -> TickOutcome {
    session.dir = session.next_dir;
    let new_head = session.snake.head().step(session.dir);

    if !grid.contains(new_head) {
        return TickOutcome::Collided(Collision::Boundary);
    }
    if session.snake.contains(new_head) {
        return TickOutcome::Collided(Collision::SelfHit);
    }

    session.snake.push_head(new_head);

    if new_head != session.food {
        session.snake.pop_tail();
        return TickOutcome::Moved;
    }

    let eaten = session.food;
    session.score += 1;
    session.speed = tuning.speed_for_score(session.score);
    if let Some(food) = place_food(&session.snake, grid, rng) {
        session.food = food;
    }
    TickOutcome::Ate { at: eaten }
}

/// Pick a free cell for the food.
///
/// Tries uniform random cells first; after [`FOOD_PLACEMENT_ATTEMPTS`] misses
/// it falls back to the first free cell in row-major order. Returns `None`
/// only when the snake covers the whole board.
pub fn place_food<R: Rng>(snake: &Snake, grid: &Grid, rng: &mut R) -> Option<Position> {
    for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
        let pos = Position::new(
            rng.random_range(0..grid.cols()),
            rng.random_range(0..grid.rows()),
        );
        if !snake.contains(pos) {
            return Some(pos);
        }
    }

    let fallback = grid.cells().find(|&pos| !snake.contains(pos));
    if fallback.is_none() {
        log::warn!("No free cell left for food");
    }
    fallback
}
