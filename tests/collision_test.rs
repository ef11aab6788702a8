//! Collision resolution and injury classification tests

use safe_follow::simulation::{
    assess_occupants, classify_injuries, g_force, impact_force_kn, injury_band, kmh_to_ms,
    resolve_pair, CollisionResolver, CrashType, ImpactSide, InjuryStatus, Seat, Severity,
    VehicleConfig, VehicleDynamicsModel, VehicleRole, GRAVITY,
};

fn approx(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

fn model(role: VehicleRole, base: VehicleConfig, position: f32, kmh: f32) -> VehicleDynamicsModel {
    let config = VehicleConfig {
        initial_position: position,
        initial_velocity: kmh_to_ms(kmh),
        ..base
    };
    VehicleDynamicsModel::new(role, &config).unwrap()
}

fn player(position: f32, kmh: f32) -> VehicleDynamicsModel {
    model(VehicleRole::Player, VehicleConfig::player(), position, kmh)
}

fn lead(position: f32, kmh: f32) -> VehicleDynamicsModel {
    model(VehicleRole::Lead, VehicleConfig::lead(), position, kmh)
}

fn tailgater(position: f32, kmh: f32) -> VehicleDynamicsModel {
    model(VehicleRole::Tailgater, VehicleConfig::tailgater(), position, kmh)
}

#[test]
fn test_equal_mass_restitution_formula() {
    let impact = resolve_pair(1500.0, 30.0, 1500.0, 10.0);

    // ((m1 - e m2) v1 + m2 (1 + e) v2) / (m1 + m2) with e = 0.2
    assert!(approx(impact.follower_velocity, 18.0, 1e-4));
    assert!(approx(impact.leader_velocity, 22.0, 1e-4));

    let before = 1500.0 * 30.0 + 1500.0 * 10.0;
    let after = 1500.0 * impact.follower_velocity + 1500.0 * impact.leader_velocity;
    assert!(approx(before, after, 1e-1));

    assert!(approx(impact.follower_delta_v, -12.0, 1e-4));
    assert!(approx(impact.closing_speed, 20.0, 1e-4));
    // 1500 * 12 / 0.1 / 1000
    assert!(approx(impact.impact_force_kn, 180.0, 1e-2));
}

#[test]
fn test_unequal_masses_conserve_momentum() {
    let impact = resolve_pair(1800.0, 25.0, 1200.0, 15.0);
    let before = 1800.0 * 25.0 + 1200.0 * 15.0;
    let after = 1800.0 * impact.follower_velocity + 1200.0 * impact.leader_velocity;
    assert!(approx(before, after, 1e-1));
    assert!(impact.leader_velocity > impact.follower_velocity);
}

#[test]
fn test_force_and_g_force() {
    assert!(approx(impact_force_kn(1500.0, -2.0), 30.0, 1e-4));
    assert!(approx(g_force(-GRAVITY * 0.1), 1.0, 1e-5));
    assert!(approx(g_force(12.0), 120.0 / GRAVITY, 1e-3));
}

#[test]
fn test_severity_tiers() {
    assert_eq!(Severity::classify(0.0, 0.0), Severity::Minor);
    assert_eq!(Severity::classify(20.0, 10.0), Severity::Minor);
    assert_eq!(Severity::classify(20.5, 0.0), Severity::Moderate);
    assert_eq!(Severity::classify(0.0, 10.5), Severity::Moderate);
    assert_eq!(Severity::classify(51.0, 0.0), Severity::Major);
    assert_eq!(Severity::classify(0.0, 41.0), Severity::Severe);
    assert_eq!(Severity::classify(151.0, 0.0), Severity::Catastrophic);
    assert_eq!(Severity::classify(10.0, 61.0), Severity::Catastrophic);
}

#[test]
fn test_severity_is_monotonic() {
    let forces: Vec<f32> = (0..40).map(|i| i as f32 * 5.0).collect();
    let speeds: Vec<f32> = (0..40).map(|i| i as f32 * 2.0).collect();

    for &speed in &speeds {
        let mut last = Severity::Minor;
        for &force in &forces {
            let tier = Severity::classify(force, speed);
            assert!(tier >= last, "force {} speed {}", force, speed);
            last = tier;
        }
    }
    for &force in &forces {
        let mut last = Severity::Minor;
        for &speed in &speeds {
            let tier = Severity::classify(force, speed);
            assert!(tier >= last, "force {} speed {}", force, speed);
            last = tier;
        }
    }
}

#[test]
fn test_injury_bands() {
    assert_eq!(injury_band(0.0), 0);
    assert_eq!(injury_band(4.99), 0);
    assert_eq!(injury_band(5.0), 1);
    assert_eq!(injury_band(17.9), 2);
    assert_eq!(injury_band(18.0), 3);
    assert_eq!(injury_band(69.0), 5);
    assert_eq!(injury_band(100.0), 7);
    assert_eq!(injury_band(1000.0), 7);

    assert_eq!(classify_injuries(2.0, ImpactSide::Rear).0, InjuryStatus::Stable);
    assert_eq!(classify_injuries(7.0, ImpactSide::Rear).0, InjuryStatus::Stable);
    assert_eq!(classify_injuries(12.0, ImpactSide::Rear).0, InjuryStatus::Moderate);
    assert_eq!(classify_injuries(20.0, ImpactSide::Front).0, InjuryStatus::Serious);
    assert_eq!(classify_injuries(40.0, ImpactSide::Front).0, InjuryStatus::Critical);
    assert_eq!(
        classify_injuries(60.0, ImpactSide::Front).0,
        InjuryStatus::CriticalUnresponsive
    );
    assert_eq!(classify_injuries(80.0, ImpactSide::Rear).0, InjuryStatus::Fatal);
}

#[test]
fn test_injury_status_is_monotonic() {
    let mut last = InjuryStatus::Stable;
    for i in 0..300 {
        let (status, injuries) = classify_injuries(i as f32 * 0.5, ImpactSide::Front);
        assert!(status >= last);
        assert!(!injuries.is_empty());
        last = status;
    }
}

#[test]
fn test_rear_and_front_vocabularies_differ() {
    let (_, rear) = classify_injuries(12.0, ImpactSide::Rear);
    let (_, front) = classify_injuries(12.0, ImpactSide::Front);
    assert_ne!(rear, front);
    assert!(rear.iter().any(|i| i.contains("Whiplash")));
}

#[test]
fn test_rear_seat_feels_less() {
    let occupants = assess_occupants(&[Seat::Driver, Seat::Rear], 11.0, ImpactSide::Rear);
    assert_eq!(occupants.len(), 2);
    assert_eq!(occupants[0].status, InjuryStatus::Moderate);
    // 11 * 0.85 = 9.35 g
    assert!(approx(occupants[1].g_force, 9.35, 1e-4));
    assert_eq!(occupants[1].status, InjuryStatus::Stable);
}

#[test]
fn test_front_collision_fires_once() {
    let mut resolver = CollisionResolver::new();
    let mut player = player(0.0, 50.0);
    let mut lead = lead(3.5, 45.0);

    let event = resolver
        .check(&mut player, &mut lead, None)
        .expect("contact should be detected");

    assert_eq!(event.crash_type, CrashType::Front);
    // Δv = 1.2 * 1500 * (50 - 45) km/h / 3000 = 0.8333 m/s
    assert!(approx(event.impact_force_kn, 12.5, 1e-2));
    assert!(approx(event.speed_diff_kmh, 5.0, 1e-3));
    assert_eq!(event.severity, Severity::Minor);
    assert!(approx(event.g_force, 0.8333 / 0.1 / GRAVITY, 1e-2));

    let player_damage = event.damage(VehicleRole::Player).unwrap();
    assert_eq!(player_damage.side, ImpactSide::Front);
    assert_eq!(player_damage.occupants[0].status, InjuryStatus::Stable);
    let lead_damage = event.damage(VehicleRole::Lead).unwrap();
    assert_eq!(lead_damage.side, ImpactSide::Rear);
    assert_eq!(lead_damage.occupants.len(), 3);

    // Velocities overwritten
    assert!(approx(player.velocity(), player_damage.velocity_after, 1e-6));
    assert!(approx(lead.velocity(), lead_damage.velocity_after, 1e-6));
    assert!(lead.velocity() > player.velocity());

    // Latched: no second event even with the cars still touching
    assert!(resolver.has_fired());
    assert!(resolver.check(&mut player, &mut lead, None).is_none());
}

#[test]
fn test_crashed_cars_coast() {
    let mut resolver = CollisionResolver::new();
    let mut player = player(0.0, 60.0);
    let mut lead = lead(3.0, 40.0);
    resolver.check(&mut player, &mut lead, None).unwrap();

    assert!(player.is_coasting());
    player.set_throttle(1.0);
    player.set_brake(1.0);
    assert_eq!(player.vehicle().throttle(), 0.0);
    assert_eq!(player.vehicle().brake(), 0.0);
}

#[test]
fn test_no_collision_without_closing_speed() {
    let mut resolver = CollisionResolver::new();

    let mut same_speed_player = player(0.0, 50.0);
    let mut same_speed_lead = lead(3.0, 50.0);
    assert!(resolver
        .check(&mut same_speed_player, &mut same_speed_lead, None)
        .is_none());

    let mut far_player = player(0.0, 80.0);
    let mut far_lead = lead(4.5, 40.0);
    assert!(resolver.check(&mut far_player, &mut far_lead, None).is_none());
    assert!(!resolver.has_fired());
}

#[test]
fn test_rear_collision_from_tailgater() {
    let mut resolver = CollisionResolver::new();
    let mut player = player(100.0, 40.0);
    let mut lead = lead(150.0, 60.0);
    let mut tailgater = tailgater(97.0, 70.0);

    let event = resolver
        .check(&mut player, &mut lead, Some(&mut tailgater))
        .unwrap();

    assert_eq!(event.crash_type, CrashType::Rear);
    assert!(event.damage(VehicleRole::Lead).is_none());
    assert_eq!(
        event.damage(VehicleRole::Player).unwrap().side,
        ImpactSide::Rear
    );
    assert_eq!(
        event.damage(VehicleRole::Tailgater).unwrap().side,
        ImpactSide::Front
    );
    // Pushed forward
    assert!(player.velocity() > kmh_to_ms(40.0));
    assert!(tailgater.is_coasting());
}

#[test]
fn test_sandwich_sums_both_impacts() {
    let mut resolver = CollisionResolver::new();
    let mut player = player(100.0, 50.0);
    let mut lead = lead(103.0, 30.0);
    let mut tailgater = tailgater(97.0, 80.0);

    let rear = resolve_pair(
        1800.0,
        kmh_to_ms(80.0),
        1500.0,
        kmh_to_ms(50.0),
    );
    let front = resolve_pair(
        1500.0,
        kmh_to_ms(50.0),
        1500.0,
        kmh_to_ms(30.0),
    );

    let event = resolver
        .check(&mut player, &mut lead, Some(&mut tailgater))
        .unwrap();

    assert_eq!(event.crash_type, CrashType::Sandwich);
    assert!(approx(
        event.impact_force_kn,
        rear.impact_force_kn + front.impact_force_kn,
        1e-2
    ));
    assert!(approx(event.speed_diff_kmh, 30.0 + 20.0, 1e-2));
    assert_eq!(
        event.severity,
        Severity::classify(event.impact_force_kn, event.speed_diff_kmh)
    );

    // Each car judged on its own velocity change
    let player_damage = event.damage(VehicleRole::Player).unwrap();
    let expected_dv = rear.leader_delta_v.abs() + front.follower_delta_v.abs();
    assert!(approx(player_damage.delta_v, expected_dv, 1e-4));
    assert!(approx(player_damage.g_force, g_force(expected_dv), 1e-3));

    let lead_damage = event.damage(VehicleRole::Lead).unwrap();
    assert!(approx(lead_damage.delta_v, front.leader_delta_v.abs(), 1e-4));
    let tail_damage = event.damage(VehicleRole::Tailgater).unwrap();
    assert!(approx(tail_damage.delta_v, rear.follower_delta_v.abs(), 1e-4));

    assert!(approx(lead.velocity(), front.leader_velocity, 1e-4));
    assert!(approx(tailgater.velocity(), rear.follower_velocity, 1e-4));
    assert!(resolver.check(&mut player, &mut lead, Some(&mut tailgater)).is_none());
}
