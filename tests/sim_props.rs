//! Property tests for the simulation invariants

use neon_snake::MemoryStore;
use neon_snake::sim::{
    Command, Direction, Game, GamePhase, Grid, Particle, ParticleSystem, Position, Session, Tuning,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn started_game(seed: u64, size: i32) -> Game {
    let mut game = Game::new(Grid::new(size, size), Tuning::default(), seed, Box::new(MemoryStore::new()));
    game.handle(Command::StartOrRetry);
    game
}

proptest! {
    #[test]
    fn tick_invariants_hold(
        seed in any::<u64>(),
        size in 3i32..12,
        turns in prop::collection::vec(direction(), 1..300),
    ) {
        let mut game = started_game(seed, size);

        for dir in turns {
            game.handle(Command::SetDirection(dir));
            let before = game.session().cloned().expect("session while playing");

            let collision = game.step();
            let after = game.session().expect("session survives the tick");

            prop_assert!(after.score >= before.score);
            prop_assert!(after.speed >= before.speed);

            if collision.is_some() {
                prop_assert_eq!(game.phase(), GamePhase::GameOver);
                prop_assert_eq!(after.snake.len(), before.snake.len());
                break;
            }

            if after.score > before.score {
                prop_assert_eq!(after.score, before.score + 1);
                prop_assert_eq!(after.snake.len(), before.snake.len() + 1);
            } else {
                prop_assert_eq!(after.snake.len(), before.snake.len());
            }
            if after.snake.len() < game.grid().area() {
                prop_assert!(!after.snake.contains(after.food));
            }
            prop_assert!(game.grid().contains(after.snake.head()));
            prop_assert!(game.high_score() >= after.score);
        }
    }

    #[test]
    fn reversal_never_changes_pending_direction(seed in any::<u64>(), dir in direction()) {
        let grid = Grid::new(10, 10);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut session = Session::new(&grid, &Tuning::default(), &mut rng);
        session.dir = dir;
        session.next_dir = dir;

        prop_assert!(!session.request_direction(dir.opposite()));
        prop_assert_eq!(session.next_dir, dir);
    }

    #[test]
    fn particle_life_decays_geometrically(n in 0u32..43) {
        let mut system = ParticleSystem::new();
        system.push(Particle {
            pos: glam::Vec2::ZERO,
            vel: glam::Vec2::ZERO,
            life: 1.0,
            color: 0,
        });
        for _ in 0..n {
            system.advance();
        }
        prop_assert_eq!(system.len(), 1);
        let expected = 0.9f32.powi(n as i32);
        let life = system.particles()[0].life;
        prop_assert!((life - expected).abs() <= expected * 1e-4);
    }

    #[test]
    fn speed_curve_is_monotone(a in 0u64..10_000, b in 0u64..10_000) {
        let tuning = Tuning::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(tuning.speed_for_score(lo) <= tuning.speed_for_score(hi));
    }

    #[test]
    fn food_placement_avoids_snake(seed in any::<u64>(), len in 2usize..20) {
        // Occupy the first `len` cells of a 5x5 board in row-major order
        let grid = Grid::new(5, 5);
        let cells: Vec<Position> = grid.cells().take(len).collect();
        let snake = neon_snake::sim::Snake::from_segments(cells.into_iter().rev());
        let mut rng = Pcg32::seed_from_u64(seed);

        let food = neon_snake::sim::place_food(&snake, &grid, &mut rng);
        prop_assert!(food.is_some());
        let food = food.unwrap();
        prop_assert!(grid.contains(food));
        prop_assert!(!snake.contains(food));
    }
}
