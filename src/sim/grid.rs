//! Board coordinate space
//!
//! The board is a fixed `cols × rows` lattice of cells. Positions use signed
//! coordinates so a head that has stepped off the board can still be
//! represented and rejected by [`Grid::contains`].

use serde::{Deserialize, Serialize};

use crate::consts::MIN_BOARD_CELLS;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell one step in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Heading of the snake (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector for this heading
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True if turning from `self` to `requested` would double back onto the neck
    pub fn is_reversal(self, requested: Direction) -> bool {
        self.opposite() == requested
    }
}

/// Immutable board dimensions for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cols: i32,
    rows: i32,
}

impl Grid {
    /// Create a grid; dimensions below one cell are clamped to 1
    pub fn new(cols: i32, rows: i32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    /// Fit a square board into the available area.
    ///
    /// The side is the smaller of the two extents, capped at `max_px`, then
    /// floored to a whole number of `cell_px` cells. The result is always
    /// [`playable`](Self::playable).
    pub fn fit(avail_w: f32, avail_h: f32, cell_px: f32, max_px: f32) -> Self {
        let cell_px = cell_px.max(1.0);
        let side = avail_w.min(avail_h).min(max_px).max(0.0);
        let cells = (side / cell_px).floor() as i32;
        Self::new(cells, cells).playable()
    }

    /// Grow each side to at least [`MIN_BOARD_CELLS`], so a fresh snake
    /// spawns fully on the board with a free cell left for food
    pub fn playable(self) -> Self {
        Self::new(self.cols.max(MIN_BOARD_CELLS), self.rows.max(MIN_BOARD_CELLS))
    }

    pub fn is_playable(&self) -> bool {
        self.cols >= MIN_BOARD_CELLS && self.rows >= MIN_BOARD_CELLS
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.cols && pos.y < self.rows
    }

    /// Centre cell (rounded down), where new sessions spawn the head
    pub fn center(&self) -> Position {
        Position::new(self.cols / 2, self.rows / 2)
    }

    /// Row-major iterator over every cell
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| Position::new(x, y)))
    }
}
