use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use lane_dodger::audio::SoundEffect;
use lane_dodger::platform::{KeyValueStore, MemoryStore, StorageError};
use lane_dodger::sim::{GamePhase, Obstacle, Steering};
use lane_dodger::{Game, GameObserver, HighScore, Tuning};

/// Store the test keeps a handle to after handing it to the game
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().remove(key)
    }
}

#[derive(Default)]
struct Recorder {
    scores: Vec<u64>,
    game_overs: Vec<u64>,
    high_scores: Vec<u64>,
    sounds: Vec<SoundEffect>,
}

impl GameObserver for Recorder {
    fn on_score_changed(&mut self, score: u64) {
        self.scores.push(score);
    }

    fn on_game_over(&mut self, final_score: u64) {
        self.game_overs.push(final_score);
    }

    fn on_new_high_score(&mut self, score: u64) {
        self.high_scores.push(score);
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        self.sounds.push(effect);
    }
}

fn new_game(store: SharedStore) -> (Game, Recorder) {
    let mut game = Game::new(2024, Tuning::default(), Box::new(store));
    let mut recorder = Recorder::default();
    game.resize(800.0, 600.0);
    game.start(&mut recorder);
    // Tests place their own obstacles
    game.state.spawn_timer_ms = f32::INFINITY;
    (game, recorder)
}

fn place_obstacle(game: &mut Game, x: f32, y: f32, speed: f32) {
    let id = game.state.next_entity_id();
    game.state.obstacles.push(Obstacle {
        id,
        pos: Vec2::new(x, y),
        size: Vec2::new(60.0, 28.0),
        color: [1.0, 0.2, 0.4, 1.0],
        speed,
    });
}

#[test]
fn initial_position_and_first_lane_change() {
    let (mut game, mut recorder) = new_game(SharedStore::default());
    assert_eq!(game.state.player.pos.x, 376.0);
    game.steer(Steering::Left, &mut recorder);
    assert_eq!(game.state.player.target_x, 176.0);
    assert_eq!(recorder.sounds, vec![SoundEffect::LaneChange]);
}

#[test]
fn crash_produces_burst_and_single_game_over() {
    let store = SharedStore::default();
    let (mut game, mut recorder) = new_game(store.clone());
    game.state.score = 57.8;
    place_obstacle(&mut game, 370.0, 455.0, 5.0);

    game.advance(16.66, &mut recorder);
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert_eq!(game.state.particles.len(), 25);
    assert_eq!(recorder.game_overs, vec![57]);
    assert!(recorder.sounds.contains(&SoundEffect::Crash));

    // Further frames keep the explosion going but never end the run again
    for _ in 0..100 {
        game.advance(16.66, &mut recorder);
    }
    assert_eq!(recorder.game_overs.len(), 1);
    assert!(game.state.particles.is_empty());
}

#[test]
fn new_record_is_persisted() {
    let store = SharedStore::default();
    let (mut game, mut recorder) = new_game(store.clone());
    game.state.score = 250.0;
    place_obstacle(&mut game, 370.0, 455.0, 5.0);
    game.advance(16.66, &mut recorder);

    assert_eq!(recorder.high_scores, vec![250]);
    assert_eq!(
        store.get(HighScore::STORAGE_KEY).as_deref(),
        Some("250")
    );

    // A worse run leaves the record alone
    game.start(&mut recorder);
    game.state.spawn_timer_ms = f32::INFINITY;
    game.state.score = 100.0;
    place_obstacle(&mut game, 370.0, 455.0, 5.0);
    game.advance(16.66, &mut recorder);
    assert_eq!(recorder.game_overs, vec![250, 100]);
    assert_eq!(recorder.high_scores, vec![250]);
    assert_eq!(game.high_score.best, 250);

    // And the record survives into the next session
    let next = Game::new(1, Tuning::default(), Box::new(store));
    assert_eq!(next.high_score.best, 250);
}

#[test]
fn obstacle_crossing_bottom_scores_exactly_once() {
    let (mut game, mut recorder) = new_game(SharedStore::default());
    // Far from the player's column
    place_obstacle(&mut game, 0.0, -100.0, 5.0);

    // (600 + 100) / 5 = 140 frame-equivalents to reach the bottom edge
    for _ in 0..140 {
        game.advance(16.66, &mut recorder);
    }
    assert!(!recorder.sounds.contains(&SoundEffect::Score));
    game.advance(16.66, &mut recorder);
    for _ in 0..60 {
        game.advance(16.66, &mut recorder);
    }

    let scored = recorder
        .sounds
        .iter()
        .filter(|s| **s == SoundEffect::Score)
        .count();
    assert_eq!(scored, 1);
    let expected = 10.0 + 0.015 * 16.66 * 201.0;
    assert!((game.state.score - expected).abs() < 0.05);
}

#[test]
fn score_changes_are_reported_floored_and_increasing() {
    let (mut game, mut recorder) = new_game(SharedStore::default());
    recorder.scores.clear();
    let mut now = 1000.0;
    for _ in 0..600 {
        game.frame(now, &mut recorder);
        now += 16.0;
    }
    assert!(!recorder.scores.is_empty());
    assert!(recorder.scores.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(recorder.scores.last().copied(), Some(game.score()));
}

#[test]
fn first_frame_after_start_has_no_elapsed_time() {
    let (mut game, mut recorder) = new_game(SharedStore::default());
    game.frame(123_456.0, &mut recorder);
    assert_eq!(game.state.run_ms, 0.0);
    game.frame(123_472.0, &mut recorder);
    assert_eq!(game.state.run_ms, 16.0);
}

#[test]
fn restart_after_game_over() {
    let (mut game, mut recorder) = new_game(SharedStore::default());
    place_obstacle(&mut game, 370.0, 455.0, 5.0);
    game.advance(16.66, &mut recorder);
    assert_eq!(game.phase(), GamePhase::GameOver);

    assert!(game.start(&mut recorder));
    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(game.score(), 0);
    assert!(game.state.obstacles.is_empty());
    assert_eq!(game.state.player.pos.x, 376.0);
    // Explosion from the last run keeps fading behind the new one
    assert_eq!(game.state.particles.len(), 25);
}

#[test]
fn difficulty_ramps_spawn_rate() {
    let mut game = Game::new(9, Tuning::default(), Box::new(MemoryStore::new()));
    let mut recorder = Recorder::default();
    game.resize(800.0, 600.0);
    game.start(&mut recorder);
    // Park the player out of reach so the run lasts
    game.state.player.pos.y = 10_000.0;

    let mut spawned_early = 0;
    let mut spawned_late = 0;
    let mut last_id = 0;
    for frame in 0..(60 * 120) {
        game.advance(16.66, &mut recorder);
        let newest = game.state.obstacles.iter().map(|o| o.id).max().unwrap_or(0);
        if newest > last_id {
            if frame < 60 * 10 {
                spawned_early += 1;
            } else if frame >= 60 * 110 {
                spawned_late += 1;
            }
            last_id = newest;
        }
    }
    assert_eq!(game.phase(), GamePhase::Playing);
    assert!(spawned_late > spawned_early);
    assert!(game.state.spawn_timer_ms <= 350.0);
}

mod properties {
    use super::*;
    use lane_dodger::sim::particles;
    use lane_dodger::sim::{GameEvent, GameState, steer, tick};
    use proptest::prelude::*;

    fn sized_playing(seed: u64, width: f32, height: f32) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.resize(width, height);
        state.start_run();
        state
    }

    proptest! {
        #[test]
        fn spawned_speed_never_below_base(seed in any::<u64>(), run_ms in 0.0f32..600_000.0) {
            let mut state = sized_playing(seed, 800.0, 600.0);
            state.base_speed = state.tuning.base_speed_at(run_ms);
            for _ in 0..20 {
                let speed = state.spawn_obstacle().speed;
                prop_assert!(speed >= state.base_speed);
            }
        }

        #[test]
        fn spawn_interval_has_floor(difficulty in 0.01f32..10_000.0) {
            prop_assert!(Tuning::default().spawn_interval(difficulty) >= 350.0);
        }

        #[test]
        fn player_stays_in_bounds(
            seed in any::<u64>(),
            width in 200.0f32..2000.0,
            moves in prop::collection::vec((any::<bool>(), 0.0f32..100.0), 0..200),
        ) {
            let mut state = sized_playing(seed, width, 600.0);
            state.spawn_timer_ms = f32::INFINITY;
            let lo = 10.0;
            let hi = width - 48.0 - 10.0;
            let mut events = Vec::new();
            for (left, dt) in moves {
                steer(&mut state, if left { Steering::Left } else { Steering::Right });
                tick(&mut state, dt, &mut events);
                prop_assert!(state.player.target_x >= lo && state.player.target_x <= hi);
                prop_assert!(state.player.pos.x >= lo - 1e-3 && state.player.pos.x <= hi + 1e-3);
            }
        }

        #[test]
        fn particle_life_strictly_decreases(seed in any::<u64>(), steps in 1usize..80) {
            let mut state = sized_playing(seed, 800.0, 600.0);
            particles::spawn_burst(
                &mut state.particles,
                &mut state.rng,
                Vec2::new(400.0, 300.0),
                [[1.0; 4], [0.0, 1.0, 1.0, 1.0]],
                &state.tuning,
            );
            for _ in 0..steps {
                let before: Vec<f32> = state.particles.iter().map(|p| p.life).collect();
                particles::advance(&mut state.particles, 0.02);
                prop_assert!(state.particles.iter().all(|p| p.life > 0.0));
                // Every particle shares its birth, so survivors keep their order
                for (p, life) in state.particles.iter().zip(before) {
                    prop_assert!(p.life < life);
                }
            }
        }

        #[test]
        fn score_covers_bonuses_and_accrual(
            seed in any::<u64>(),
            dts in prop::collection::vec(1.0f32..50.0, 1..400),
        ) {
            let mut state = sized_playing(seed, 800.0, 600.0);
            let mut events = Vec::new();
            let mut elapsed = 0.0f64;
            for dt in dts {
                tick(&mut state, dt, &mut events);
                if state.phase != GamePhase::Playing {
                    break;
                }
                elapsed += dt as f64;
            }
            let dodged = events
                .iter()
                .filter(|e| matches!(e, GameEvent::Dodged { .. }))
                .count() as f64;
            prop_assert!(state.score + 1e-6 >= 10.0 * dodged + 0.015 * elapsed);
        }
    }
}
