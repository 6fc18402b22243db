//! Game state machine
//!
//! `Start → Playing ⇄ Paused`, `Playing → GameOver → Playing`. The [`Game`]
//! owns the board, the current session, the particle system, the best score
//! and the RNG, and is the only thing that decides when the simulation ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::grid::{Direction, Grid, Position};
use super::particles::ParticleSystem;
use super::state::{
    Collision, GameEvent, GamePhase, Session, SessionSummary, SoundEffect, Tuning,
};
use super::tick::{TickOutcome, tick};
use crate::consts::*;
use crate::highscores::HighScoreStore;

/// Commands delivered by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetDirection(Direction),
    /// Start a session from the title screen or after a game over
    StartOrRetry,
    TogglePause,
    /// Resume button: only acts while paused
    Resume,
    /// Tab hidden or window blurred
    FocusLost,
}

/// Particle burst sizes; zero disables a burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstConfig {
    pub consume: usize,
    pub death: usize,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            consume: CONSUME_BURST,
            death: DEATH_BURST,
        }
    }
}

/// The whole game: phase, session, effects and best score
pub struct Game {
    grid: Grid,
    tuning: Tuning,
    bursts: BurstConfig,
    phase: GamePhase,
    session: Option<Session>,
    particles: ParticleSystem,
    high_score: u64,
    summary: Option<SessionSummary>,
    store: Box<dyn HighScoreStore>,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a game on the title screen. Loads the best score once.
    ///
    /// Boards too small for a fresh snake are grown to the smallest
    /// playable size.
    pub fn new(grid: Grid, tuning: Tuning, seed: u64, store: Box<dyn HighScoreStore>) -> Self {
        if !grid.is_playable() {
            log::warn!(
                "{}x{} board is too small, using {}x{}",
                grid.cols(),
                grid.rows(),
                grid.playable().cols(),
                grid.playable().rows()
            );
        }
        let grid = grid.playable();
        let high_score = store.load_high_score().unwrap_or_else(|e| {
            log::warn!("Could not load high score: {}", e);
            0
        });
        log::info!(
            "Game created: {}x{} board, best {}",
            grid.cols(),
            grid.rows(),
            high_score
        );
        Self {
            grid,
            tuning,
            bursts: BurstConfig::default(),
            phase: GamePhase::Start,
            session: None,
            particles: ParticleSystem::new(),
            high_score,
            summary: None,
            store,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn with_bursts(mut self, bursts: BurstConfig) -> Self {
        self.bursts = bursts;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Summary of the last finished session, set on entering `GameOver`
    pub fn summary(&self) -> Option<SessionSummary> {
        self.summary
    }

    pub fn score(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.score)
    }

    /// Milliseconds per tick at the current speed, `None` without a session
    pub fn tick_interval_ms(&self) -> Option<f64> {
        self.session.as_ref().map(Session::tick_interval_ms)
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply an input command. Commands that make no sense in the current
    /// phase are ignored.
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::SetDirection(dir) => self.set_direction(dir),
            Command::StartOrRetry => {
                if matches!(self.phase, GamePhase::Start | GamePhase::GameOver) {
                    self.start();
                }
            }
            Command::TogglePause => match self.phase {
                GamePhase::Playing => self.pause(),
                GamePhase::Paused => self.resume(),
                GamePhase::Start | GamePhase::GameOver => {}
            },
            Command::Resume => {
                if self.phase == GamePhase::Paused {
                    self.resume();
                }
            }
            Command::FocusLost => {
                if self.phase == GamePhase::Playing {
                    log::info!("Auto-paused (focus lost)");
                    self.pause();
                }
            }
        }
    }

    /// Queue a heading change for the next tick
    fn set_direction(&mut self, dir: Direction) {
        if !matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            if !session.request_direction(dir) {
                log::trace!("Ignored reversal to {:?}", dir);
            }
        }
    }

    /// Begin a fresh session, discarding any previous one
    pub fn start(&mut self) {
        self.particles.clear();
        self.summary = None;
        self.session = Some(Session::new(&self.grid, &self.tuning, &mut self.rng));
        log::info!("Session started");
        self.events.push(GameEvent::ScoreChanged {
            score: 0,
            high_score: self.high_score,
        });
        self.set_phase(GamePhase::Playing);
    }

    fn pause(&mut self) {
        self.set_phase(GamePhase::Paused);
    }

    fn resume(&mut self) {
        self.set_phase(GamePhase::Playing);
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::debug!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }

    /// Run one simulation tick if playing. Returns the collision that ended
    /// the session, if any.
    pub fn step(&mut self) -> Option<Collision> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let session = self.session.as_mut()?;

        match tick(session, &self.grid, &self.tuning, &mut self.rng) {
            TickOutcome::Moved => None,
            TickOutcome::Ate { at } => {
                self.on_food_eaten(at);
                None
            }
            TickOutcome::Collided(collision) => {
                self.game_over(collision);
                Some(collision)
            }
        }
    }

    fn on_food_eaten(&mut self, at: Position) {
        let score = self.score();
        if score > self.high_score {
            self.high_score = score;
            if let Err(e) = self.store.save_high_score(score) {
                log::warn!("Failed to save high score: {}", e);
            }
        }
        self.events.push(GameEvent::ScoreChanged {
            score,
            high_score: self.high_score,
        });
        self.particles
            .spawn_burst(&mut self.rng, cell_center(at), CONSUME_COLOR, self.bursts.consume);
        self.events.push(GameEvent::Sound(SoundEffect::Consume));
    }

    fn game_over(&mut self, collision: Collision) {
        let (score, head) = match self.session.as_ref() {
            Some(s) => (s.score, s.snake.head()),
            None => return,
        };
        let summary = SessionSummary {
            score,
            high_score: self.high_score,
            new_best: score > 0 && score == self.high_score,
        };
        log::info!(
            "Game over ({:?}): score {}{}",
            collision,
            score,
            if summary.new_best { " - new best!" } else { "" }
        );

        self.summary = Some(summary);
        self.events.push(GameEvent::Sound(SoundEffect::Death));
        self.particles
            .spawn_burst(&mut self.rng, cell_center(head), DEATH_COLOR, self.bursts.death);
        self.set_phase(GamePhase::GameOver);
        self.events.push(GameEvent::GameOver(summary));
    }

    /// Advance particles by one rendered frame
    pub fn advance_particles(&mut self) {
        self.particles.advance();
    }

    /// Replace the current session (scripted setups and tests)
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Mutable access to the session, for scripted setups and tests
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }
}

/// Centre of a cell in board cell units
pub fn cell_center(pos: Position) -> Vec2 {
    Vec2::new(pos.x as f32 + 0.5, pos.y as f32 + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::state::Snake;

    fn new_game(store: MemoryStore) -> Game {
        Game::new(Grid::new(10, 10), Tuning::default(), 1234, Box::new(store))
    }

    #[test]
    fn test_starts_on_title_screen() {
        let game = new_game(MemoryStore::with_value(5));
        assert_eq!(game.phase(), GamePhase::Start);
        assert!(game.session().is_none());
        assert_eq!(game.high_score(), 5);
    }

    #[test]
    fn test_start_command() {
        let mut game = new_game(MemoryStore::new());
        game.handle(Command::StartOrRetry);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.session().map(|s| s.snake.len()), Some(2));
        assert!(
            game.drain_events()
                .contains(&GameEvent::PhaseChanged(GamePhase::Playing))
        );
    }

    #[test]
    fn test_pause_toggle_noop_outside_session() {
        let mut game = new_game(MemoryStore::new());
        game.handle(Command::TogglePause);
        assert_eq!(game.phase(), GamePhase::Start);
        game.handle(Command::Resume);
        assert_eq!(game.phase(), GamePhase::Start);
    }

    #[test]
    fn test_pause_and_resume_keep_session() {
        let mut game = new_game(MemoryStore::new());
        game.start();
        game.step();
        let before = game.session().cloned().map(|s| s.snake);

        game.handle(Command::TogglePause);
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(game.step(), None);
        assert_eq!(game.session().cloned().map(|s| s.snake), before);

        game.handle(Command::TogglePause);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_focus_lost_pauses_only_when_playing() {
        let mut game = new_game(MemoryStore::new());
        game.handle(Command::FocusLost);
        assert_eq!(game.phase(), GamePhase::Start);

        game.start();
        game.handle(Command::FocusLost);
        assert_eq!(game.phase(), GamePhase::Paused);

        // Losing focus again while paused does not resume
        game.handle(Command::FocusLost);
        assert_eq!(game.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut game = new_game(MemoryStore::new());
        game.start();
        game.step();
        let head = game.session().map(|s| s.snake.head());
        game.handle(Command::StartOrRetry);
        assert_eq!(game.session().map(|s| s.snake.head()), head);
    }

    #[test]
    fn test_boundary_collision_ends_session() {
        let mut game = new_game(MemoryStore::new());
        game.start();
        // Head at (5,5) heading right on a 10-wide board: (6..=9) then out
        let mut collision = None;
        for _ in 0..10 {
            if let Some(session) = game.session_mut() {
                session.food = Position::new(0, 0);
            }
            collision = game.step();
            if collision.is_some() {
                break;
            }
        }
        assert_eq!(collision, Some(Collision::Boundary));
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.session().map(|s| s.snake.head()), Some(Position::new(9, 5)));

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Death)));
        assert!(matches!(events.last(), Some(GameEvent::GameOver(_))));
        assert_eq!(game.particles().len(), DEATH_BURST);

        // No more ticks once the session is over
        assert_eq!(game.step(), None);
    }

    #[test]
    fn test_eating_raises_and_persists_high_score() {
        let store = MemoryStore::with_value(0);
        let mut game = new_game(store.clone());
        game.start();
        game.drain_events();
        if let Some(session) = game.session_mut() {
            session.food = Position::new(6, 5);
        }

        assert_eq!(game.step(), None);
        assert_eq!(game.score(), 1);
        assert_eq!(game.high_score(), 1);
        assert_eq!(store.get(), 1);
        assert_eq!(game.particles().len(), CONSUME_BURST);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundEffect::Consume)));
        assert!(events.contains(&GameEvent::ScoreChanged {
            score: 1,
            high_score: 1
        }));
    }

    #[test]
    fn test_high_score_not_lowered() {
        let store = MemoryStore::with_value(10);
        let mut game = new_game(store.clone());
        game.start();
        if let Some(session) = game.session_mut() {
            session.food = Position::new(6, 5);
        }
        game.step();
        assert_eq!(game.high_score(), 10);
        assert_eq!(store.get(), 10);
    }

    #[test]
    fn test_summary_flags_new_best() {
        let mut game = new_game(MemoryStore::with_value(0));
        game.start();
        let grid = *game.grid();
        let snake = Snake::from_segments([Position::new(8, 5), Position::new(7, 5)]);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut session = Session::with_snake(snake, Direction::Right, &grid, &Tuning::default(), &mut rng);
        session.food = Position::new(9, 5);
        game.set_session(session);

        assert_eq!(game.step(), None);
        assert_eq!(game.step(), Some(Collision::Boundary));
        let summary = game.summary().unwrap();
        assert_eq!(summary.score, 1);
        assert!(summary.new_best);
    }

    #[test]
    fn test_summary_zero_score_is_not_best() {
        let mut game = new_game(MemoryStore::with_value(0));
        game.start();
        if let Some(session) = game.session_mut() {
            session.food = Position::new(0, 0);
        }
        while game.step().is_none() {}
        let summary = game.summary().unwrap();
        assert_eq!(summary.score, 0);
        assert!(!summary.new_best);
    }

    #[test]
    fn test_retry_resets_session_and_particles() {
        let mut game = new_game(MemoryStore::new());
        game.start();
        if let Some(session) = game.session_mut() {
            session.food = Position::new(0, 0);
        }
        while game.step().is_none() {}
        assert!(!game.particles().is_empty());

        game.handle(Command::StartOrRetry);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.particles().is_empty());
        assert!(game.summary().is_none());
        assert_eq!(game.score(), 0);
        assert_eq!(game.session().map(|s| s.speed), Some(START_SPEED));
    }

    #[test]
    fn test_smallest_board_spawns_on_grid() {
        for grid in [Grid::fit(30.0, 30.0, 20.0, 500.0), Grid::new(1, 1), Grid::new(2, 1)] {
            let mut game = Game::new(grid, Tuning::default(), 7, Box::new(MemoryStore::new()));
            game.handle(Command::StartOrRetry);
            let session = game.session().unwrap();
            for segment in session.snake.segments() {
                assert!(game.grid().contains(*segment), "{:?} off board", segment);
            }
            assert!(game.grid().contains(session.food));
            assert!(!session.snake.contains(session.food));
        }
    }

    #[test]
    fn test_direction_ignored_on_title_screen() {
        let mut game = new_game(MemoryStore::new());
        game.handle(Command::SetDirection(Direction::Up));
        assert!(game.session().is_none());
    }

    #[test]
    fn test_reverse_direction_command_ignored() {
        let mut game = new_game(MemoryStore::new());
        game.start();
        game.handle(Command::SetDirection(Direction::Left));
        assert_eq!(game.session().map(|s| s.next_dir), Some(Direction::Right));
    }
}
