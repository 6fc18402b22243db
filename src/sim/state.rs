//! Game state and core simulation types
//!
//! A [`Session`] holds everything that lives for exactly one play-through:
//! the snake, the food, the score and the current speed. It is rebuilt from
//! scratch on every start/retry.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, Position};
use super::tick::place_food;
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no session yet
    Start,
    /// Ticks execute
    Playing,
    /// Ticks suspended, session retained
    Paused,
    /// Session ended, summary available
    GameOver,
}

/// What the snake ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    /// Head left the board
    Boundary,
    /// Head landed on its own body
    SelfHit,
}

/// Sound cues emitted by the simulation; the audio layer maps them to tones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Consume,
    Death,
}

/// Final numbers shown on the game-over overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub high_score: u64,
    /// Score matched the (possibly just raised) high score
    pub new_best: bool,
}

/// Events queued for the host (audio, HUD, overlays)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Sound(SoundEffect),
    ScoreChanged { score: u64, high_score: u64 },
    PhaseChanged(GamePhase),
    GameOver(SessionSummary),
}

/// Speed curve parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Ticks per second at score 0
    pub start_speed: f32,
    /// Ticks per second gained per food
    pub speed_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_speed: START_SPEED,
            speed_step: SPEED_STEP,
        }
    }
}

impl Tuning {
    /// Ticks per second for a given score. Monotone in `score`.
    pub fn speed_for_score(&self, score: u64) -> f32 {
        self.start_speed + score as f32 * self.speed_step.max(0.0)
    }
}

/// The snake body, head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Build a snake from explicit segments (head first)
    pub fn from_segments(segments: impl IntoIterator<Item = Position>) -> Self {
        Self {
            body: segments.into_iter().collect(),
        }
    }

    /// Two-segment snake with its head at `head`, tail trailing opposite to `dir`
    pub fn spawn(head: Position, dir: Direction) -> Self {
        Self::from_segments([head, head.step(dir.opposite())])
    }

    pub fn head(&self) -> Position {
        // A snake is never constructed empty and never shrinks below its spawn length
        self.body.front().copied().unwrap_or(Position::new(0, 0))
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Segments head to tail
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Position> {
        self.body.iter()
    }

    pub(crate) fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
    }

    pub(crate) fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop_back()
    }
}

/// One play-through worth of simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub snake: Snake,
    /// Active direction, applied on the tick that just ran
    pub dir: Direction,
    /// Pending direction, committed at the start of the next tick
    pub next_dir: Direction,
    pub food: Position,
    pub score: u64,
    /// Ticks per second
    pub speed: f32,
}

impl Session {
    /// Fresh session: two-segment snake at the centre heading right
    pub fn new<R: Rng>(grid: &Grid, tuning: &Tuning, rng: &mut R) -> Self {
        let dir = Direction::Right;
        let snake = Snake::spawn(grid.center(), dir);
        Self::with_snake(snake, dir, grid, tuning, rng)
    }

    /// Session from an explicit body, with food placed randomly
    pub fn with_snake<R: Rng>(
        snake: Snake,
        dir: Direction,
        grid: &Grid,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let food = place_food(&snake, grid, rng).unwrap_or(snake.head());
        Self {
            snake,
            dir,
            next_dir: dir,
            food,
            score: 0,
            speed: tuning.speed_for_score(0),
        }
    }

    /// Request a new heading. A request that exactly reverses the active
    /// direction is dropped. Returns whether it was accepted.
    pub fn request_direction(&mut self, requested: Direction) -> bool {
        if self.dir.is_reversal(requested) {
            return false;
        }
        self.next_dir = requested;
        true
    }

    /// Milliseconds between ticks at the current speed
    pub fn tick_interval_ms(&self) -> f64 {
        1000.0 / self.speed.max(f32::EPSILON) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_session_layout() {
        let grid = Grid::new(10, 10);
        let mut rng = Pcg32::seed_from_u64(1);
        let session = Session::new(&grid, &Tuning::default(), &mut rng);

        let body: Vec<_> = session.snake.segments().copied().collect();
        assert_eq!(body, vec![Position::new(5, 5), Position::new(4, 5)]);
        assert_eq!(session.dir, Direction::Right);
        assert_eq!(session.next_dir, Direction::Right);
        assert_eq!(session.score, 0);
        assert_eq!(session.speed, START_SPEED);
        assert!(!session.snake.contains(session.food));
        assert!(grid.contains(session.food));
    }

    #[test]
    fn test_reverse_request_rejected() {
        let grid = Grid::new(10, 10);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut session = Session::new(&grid, &Tuning::default(), &mut rng);

        assert!(!session.request_direction(Direction::Left));
        assert_eq!(session.next_dir, Direction::Right);

        assert!(session.request_direction(Direction::Up));
        assert_eq!(session.next_dir, Direction::Up);
    }

    #[test]
    fn test_reversal_checked_against_active_direction() {
        let grid = Grid::new(10, 10);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut session = Session::new(&grid, &Tuning::default(), &mut rng);

        // Up is pending but Right is still active, so Left is still a reversal
        session.request_direction(Direction::Up);
        assert!(!session.request_direction(Direction::Left));
        assert_eq!(session.next_dir, Direction::Up);
    }

    #[test]
    fn test_speed_curve() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed_for_score(0), 7.0);
        assert_eq!(tuning.speed_for_score(4), 8.0);
        assert!(tuning.speed_for_score(10) > tuning.speed_for_score(9));
    }

    #[test]
    fn test_tick_interval() {
        let grid = Grid::new(10, 10);
        let mut rng = Pcg32::seed_from_u64(4);
        let mut session = Session::new(&grid, &Tuning::default(), &mut rng);
        session.speed = 8.0;
        assert!((session.tick_interval_ms() - 125.0).abs() < 1e-9);
    }
}
