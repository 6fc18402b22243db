//! Frame-driven fixed-interval scheduler
//!
//! Called once per display frame with a monotonically increasing timestamp.
//! Elapsed time is accumulated and spent in whole tick intervals, where the
//! interval is re-read from the current speed before every tick.

use super::game::Game;
use super::state::GamePhase;
use crate::consts::{MAX_FRAME_DT_MS, MAX_TICKS_PER_FRAME};

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Simulation ticks run this frame
    pub ticks: u32,
    /// Backlog was discarded because the per-frame tick cap was hit
    pub dropped_backlog: bool,
}

/// Accumulator that turns frame timestamps into simulation ticks
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    accumulator_ms: f64,
    last_timestamp: Option<f64>,
    max_ticks_per_frame: u32,
    max_frame_dt_ms: f64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(MAX_TICKS_PER_FRAME, MAX_FRAME_DT_MS)
    }
}

impl FrameScheduler {
    pub fn new(max_ticks_per_frame: u32, max_frame_dt_ms: f64) -> Self {
        Self {
            accumulator_ms: 0.0,
            last_timestamp: None,
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            max_frame_dt_ms: max_frame_dt_ms.max(0.0),
        }
    }

    /// Unspent time carried into the next frame
    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Run the ticks owed for this frame, then advance particles by one frame.
    ///
    /// Outside `Playing` no time is banked, so resuming from a pause does not
    /// replay the paused interval.
    pub fn frame(&mut self, timestamp_ms: f64, game: &mut Game) -> FrameReport {
        let dt = match self.last_timestamp {
            Some(last) => (timestamp_ms - last).clamp(0.0, self.max_frame_dt_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);

        let report = self.run_ticks(dt, game);
        game.advance_particles();
        report
    }

    fn run_ticks(&mut self, dt: f64, game: &mut Game) -> FrameReport {
        let mut report = FrameReport::default();
        if game.phase() != GamePhase::Playing {
            self.accumulator_ms = 0.0;
            return report;
        }

        self.accumulator_ms += dt;
        while game.phase() == GamePhase::Playing {
            let Some(interval) = game.tick_interval_ms() else {
                break;
            };
            if self.accumulator_ms < interval {
                break;
            }
            if report.ticks >= self.max_ticks_per_frame {
                log::debug!("Tick cap hit, dropping {:.1}ms backlog", self.accumulator_ms);
                self.accumulator_ms = 0.0;
                report.dropped_backlog = true;
                break;
            }
            self.accumulator_ms -= interval;
            game.step();
            report.ticks += 1;
        }

        if game.phase() != GamePhase::Playing {
            self.accumulator_ms = 0.0;
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::grid::{Grid, Position};
    use crate::sim::state::Tuning;

    /// 40x40 board with the food parked out of the way; 7 ticks/s = ~142.9ms
    fn playing_game() -> Game {
        let mut game = Game::new(
            Grid::new(40, 40),
            Tuning::default(),
            77,
            Box::new(MemoryStore::new()),
        );
        game.start();
        if let Some(session) = game.session_mut() {
            session.food = Position::new(0, 39);
        }
        game
    }

    fn head_x(game: &Game) -> i32 {
        game.session().map(|s| s.snake.head().x).unwrap_or(-1)
    }

    #[test]
    fn test_first_frame_runs_no_ticks() {
        let mut game = playing_game();
        let mut scheduler = FrameScheduler::default();
        assert_eq!(scheduler.frame(1000.0, &mut game).ticks, 0);
        assert_eq!(head_x(&game), 20);
    }

    #[test]
    fn test_zero_ticks_before_interval() {
        let mut game = playing_game();
        let mut scheduler = FrameScheduler::default();
        scheduler.frame(0.0, &mut game);
        assert_eq!(scheduler.frame(100.0, &mut game).ticks, 0);
        assert_eq!(scheduler.frame(140.0, &mut game).ticks, 0);
        assert_eq!(scheduler.frame(150.0, &mut game).ticks, 1);
        assert_eq!(head_x(&game), 21);
    }

    #[test]
    fn test_dropped_frames_run_multiple_ticks() {
        let mut game = playing_game();
        let mut scheduler = FrameScheduler::default();
        scheduler.frame(0.0, &mut game);
        // 3 intervals at 7/s = 428.6ms, clamp is 250ms so feed it in two frames
        let a = scheduler.frame(220.0, &mut game).ticks;
        let b = scheduler.frame(440.0, &mut game).ticks;
        assert_eq!(a + b, 3);
        assert_eq!(head_x(&game), 23);
        assert!(scheduler.accumulator_ms() < game.tick_interval_ms().unwrap());
    }

    #[test]
    fn test_speed_change_applies_immediately() {
        let mut game = playing_game();
        let mut scheduler = FrameScheduler::default();
        scheduler.frame(0.0, &mut game);
        if let Some(session) = game.session_mut() {
            session.speed = 20.0; // 50ms
        }
        assert_eq!(scheduler.frame(200.0, &mut game).ticks, 4);
    }

    #[test]
    fn test_tick_cap_drops_backlog() {
        let mut game = playing_game();
        let mut scheduler = FrameScheduler::new(2, 1000.0);
        scheduler.frame(0.0, &mut game);
        if let Some(session) = game.session_mut() {
            session.speed = 100.0; // 10ms
        }
        let report = scheduler.frame(100.0, &mut game);
        assert_eq!(report.ticks, 2);
        assert!(report.dropped_backlog);
        assert_eq!(scheduler.accumulator_ms(), 0.0);
    }

    #[test]
    fn test_no_ticks_while_paused_and_no_catch_up() {
        use crate::sim::Command;

        let mut game = playing_game();
        let mut scheduler = FrameScheduler::default();
        scheduler.frame(0.0, &mut game);
        game.handle(Command::TogglePause);

        for t in 1..20 {
            assert_eq!(scheduler.frame(t as f64 * 100.0, &mut game).ticks, 0);
        }
        assert_eq!(head_x(&game), 20);

        game.handle(Command::TogglePause);
        // Only the time since the last paused frame counts
        assert_eq!(scheduler.frame(1950.0, &mut game).ticks, 0);
        assert_eq!(scheduler.frame(2050.0, &mut game).ticks, 1);
    }

    #[test]
    fn test_particles_advance_every_frame() {
        let mut game = playing_game();
        if let Some(session) = game.session_mut() {
            session.food = Position::new(21, 20);
        }
        let mut scheduler = FrameScheduler::default();
        scheduler.frame(0.0, &mut game);
        scheduler.frame(150.0, &mut game);
        assert_eq!(game.score(), 1);
        let life = game.particles().particles()[0].life;
        assert!((life - 0.9).abs() < 1e-6);

        game.handle(crate::sim::Command::TogglePause);
        scheduler.frame(160.0, &mut game);
        let life = game.particles().particles()[0].life;
        assert!((life - 0.81).abs() < 1e-6);
    }
}
