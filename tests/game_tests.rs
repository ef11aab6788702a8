//! Game mechanics validation test
//!
//! This test validates scoring, pedal input, road signs and the leaderboard

use rand::rngs::StdRng;
use rand::SeedableRng;
use safe_follow::simulation::{
    closeness, GameState, Leaderboard, PedalInput, ResultSink, RoadSigns, ScriptedDriver,
    SessionConfig, SessionResult, Severity, Traction, BRAKE_INITIAL, MIN_SIGN_SPACING,
    POINTS_PER_SECOND, SPEED_LIMITS_KMH, UNSAFE_PENALTY_PER_SECOND,
};

#[test]
fn test_game_state_initialization() {
    let game_state = GameState::new();
    assert_eq!(game_state.score, 0.0);
    assert_eq!(game_state.time, 0.0);
    assert_eq!(game_state.unsafe_time, 0.0);
    assert!(!game_state.is_over);
}

#[test]
fn test_closeness_curve() {
    assert_eq!(closeness(9.0, 10.0), None);
    assert_eq!(closeness(10.0, 10.0), Some(1.0));
    assert_eq!(closeness(15.0, 10.0), Some(1.0));
    assert_eq!(closeness(22.5, 10.0), Some(0.5));
    assert_eq!(closeness(30.0, 10.0), Some(0.0));
    assert_eq!(closeness(100.0, 10.0), Some(0.0));
}

#[test]
fn test_close_controlled_driving_scores() {
    let mut game_state = GameState::new();
    game_state.update(1.0, 12.0, 10.0, 20.0);
    assert!((game_state.score - POINTS_PER_SECOND).abs() < 1e-5);

    // Far behind earns nothing
    game_state.update(1.0, 40.0, 10.0, 20.0);
    assert!((game_state.score - POINTS_PER_SECOND).abs() < 1e-5);
    assert!((game_state.time - 2.0).abs() < 1e-5);
}

#[test]
fn test_unsafe_driving_costs_points() {
    let mut game_state = GameState::new();
    game_state.update(2.0, 12.0, 10.0, 20.0);
    game_state.update(1.0, 5.0, 10.0, 20.0);

    let expected = 2.0 * POINTS_PER_SECOND - UNSAFE_PENALTY_PER_SECOND;
    assert!((game_state.score - expected).abs() < 1e-4);
    assert!((game_state.unsafe_time - 1.0).abs() < 1e-5);

    // Never below zero
    game_state.update(100.0, 5.0, 10.0, 20.0);
    assert_eq!(game_state.score, 0.0);
}

#[test]
fn test_standing_still_scores_nothing() {
    let mut game_state = GameState::new();
    game_state.update(5.0, 12.0, 10.0, 0.0);
    assert_eq!(game_state.score, 0.0);
    assert_eq!(game_state.unsafe_time, 0.0);
}

#[test]
fn test_game_over_freezes_score() {
    let mut game_state = GameState::new();
    game_state.update(1.0, 12.0, 10.0, 20.0);
    game_state.end();
    game_state.update(1.0, 12.0, 10.0, 20.0);

    assert!(game_state.is_over);
    assert_eq!(game_state.rounded_score(), 10);
    assert!(game_state.summary().contains("GAME OVER"));
}

#[test]
fn test_brake_ramp() {
    let mut input = PedalInput::new();
    assert_eq!(input.brake(), 0.0);

    input.hold_brake();
    assert!((input.brake() - 0.1).abs() < 1e-6);

    input.update(0.5);
    assert!((input.brake() - 0.55).abs() < 1e-5);

    input.update(2.0);
    assert_eq!(input.brake(), 1.0);

    // Holding again does not restart the ramp
    input.hold_brake();
    assert_eq!(input.brake(), 1.0);

    input.release_brake();
    assert_eq!(input.brake(), 0.0);
}

#[test]
fn test_throttle_is_binary() {
    let mut input = PedalInput::new();
    assert_eq!(input.throttle(), 0.0);
    input.hold_throttle();
    assert_eq!(input.throttle(), 1.0);
    assert_eq!(input.command().throttle, 1.0);
    input.release_throttle();
    assert_eq!(input.throttle(), 0.0);
}

#[test]
fn test_scripted_driver_pedals() {
    let driver = ScriptedDriver::new(1.0);
    let mut input = PedalInput::new();

    // Safe distance at 20 m/s on a dry road is 30 m
    driver.drive(&mut input, 60.0, 20.0, Traction::DRY);
    assert_eq!(input.throttle(), 1.0);
    assert_eq!(input.brake(), 0.0);

    driver.drive(&mut input, 20.0, 20.0, Traction::DRY);
    assert_eq!(input.throttle(), 0.0);
    assert!(input.brake() > 0.0);

    driver.drive(&mut input, 31.0, 20.0, Traction::DRY);
    assert_eq!(input.throttle(), 0.0);
    assert_eq!(input.brake(), 0.0);
}

#[test]
fn test_scripted_driver_sends_initial_brake_first() {
    let driver = ScriptedDriver::new(1.0);
    let mut input = PedalInput::new();

    // Too close: the first braking tick sends the initial brake value
    let first = driver.step(&mut input, 20.0, 20.0, Traction::DRY, 0.05);
    assert_eq!(first.brake, BRAKE_INITIAL);
    assert_eq!(first.throttle, 0.0);

    let second = driver.step(&mut input, 20.0, 20.0, Traction::DRY, 0.05);
    assert!((second.brake - 0.145).abs() < 1e-5);
}

#[test]
fn test_scripted_driver_ramp_uses_clamped_delta() {
    let driver = ScriptedDriver::new(1.0);
    let mut input = PedalInput::new();

    // A 5 s frame hitch only advances the ramp by 100 ms
    let first = driver.step(&mut input, 20.0, 20.0, Traction::DRY, 5.0);
    assert_eq!(first.brake, BRAKE_INITIAL);

    let second = driver.step(&mut input, 20.0, 20.0, Traction::DRY, 0.05);
    assert!((second.brake - 0.19).abs() < 1e-5);
}

#[test]
fn test_road_signs_change_limit() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut signs = RoadSigns::new(100.0, 100.0, 80.0).unwrap();

    assert_eq!(signs.poll(50.0, &mut rng), None);

    let limit = signs.poll(120.0, &mut rng).expect("sign passed");
    assert_ne!(limit, 80.0);
    assert!(SPEED_LIMITS_KMH.contains(&limit));
    assert_eq!(signs.current_limit(), limit);
    assert_eq!(signs.next_sign_at(), 200.0);

    // Same stretch of road, no new sign
    assert_eq!(signs.poll(150.0, &mut rng), None);
}

#[test]
fn test_road_signs_reject_bad_spacing() {
    assert!(RoadSigns::new(0.0, 100.0, 80.0).is_err());
    assert!(RoadSigns::new(1e-3, 100.0, 80.0).is_err());
    assert!(RoadSigns::new(MIN_SIGN_SPACING, 100.0, 80.0).is_ok());
    assert!(RoadSigns::new(100.0, 100.0, 0.0).is_err());

    let tiny_spacing = SessionConfig {
        sign_spacing: 1e-3,
        ..SessionConfig::default()
    };
    assert!(tiny_spacing.validate().is_err());
}

#[test]
fn test_road_signs_skip_to_the_next_sign_after_a_long_jump() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut signs = RoadSigns::new(MIN_SIGN_SPACING, 0.0, 80.0).unwrap();

    // One new limit for the whole stretch, not one per sign passed
    assert!(signs.poll(100_000.0, &mut rng).is_some());
    assert!(signs.next_sign_at() > 100_000.0);
    assert!(signs.next_sign_at() <= 100_000.0 + MIN_SIGN_SPACING);

    assert_eq!(signs.poll(100_005.0, &mut rng), None);
    assert_eq!(signs.poll(f32::NAN, &mut rng), None);
}

fn result(score: i64, distance_km: f32) -> SessionResult {
    SessionResult {
        score,
        distance_km,
        crash: None,
    }
}

#[test]
fn test_leaderboard_orders_best_first() {
    let mut board = Leaderboard::new(3);
    board.record(result(10, 1.0));
    board.record(result(50, 2.0));
    board.record(SessionResult {
        score: 30,
        distance_km: 0.5,
        crash: Some(Severity::Major),
    });

    let scores: Vec<i64> = board.entries().map(|e| e.score).collect();
    assert_eq!(scores, vec![50, 30, 10]);
    assert!(board.entries().nth(1).unwrap().crashed);
}

#[test]
fn test_leaderboard_breaks_ties_on_distance() {
    let mut board = Leaderboard::new(5);
    board.record(result(20, 1.0));
    board.record(result(20, 3.0));

    assert_eq!(board.best().unwrap().distance_km.into_inner(), 3.0);
}

#[test]
fn test_leaderboard_capacity() {
    let mut board = Leaderboard::new(2);
    assert_eq!(board.insert(result(10, 1.0)), Some(0));
    assert_eq!(board.insert(result(20, 1.0)), Some(0));
    assert_eq!(board.insert(result(5, 1.0)), None);
    assert_eq!(board.insert(result(15, 1.0)), Some(1));

    assert_eq!(board.len(), 2);
    let scores: Vec<i64> = board.entries().map(|e| e.score).collect();
    assert_eq!(scores, vec![20, 15]);
}
