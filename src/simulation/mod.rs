//! Standalone following-distance simulation module
//!
//! This module contains all the core simulation logic: vehicle dynamics,
//! the lead driver, the tailgater, collisions and scoring. Rendering, audio
//! and raw input capture live outside and talk to it through [`Session`]
//! and [`Snapshot`].

mod collision;
mod config;
mod game_state;
mod injury;
mod input;
mod lead;
mod leaderboard;
mod road_signs;
mod safety;
mod tailgater;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
pub use collision::{
    g_force, impact_force_kn, is_contact, resolve_pair, CollisionEvent, CollisionResolver,
    CrashType, PairImpact, Severity, VehicleDamage, CLOSING_SPEED_THRESHOLD, COLLISION_DISTANCE,
    IMPACT_DURATION, RESTITUTION,
};
pub use config::SessionConfig;
pub use game_state::{
    closeness, GameState, IDEAL_GAP_FACTOR, MAX_SCORING_GAP_FACTOR, MIN_SCORING_SPEED,
    POINTS_PER_SECOND, UNSAFE_PENALTY_PER_SECOND,
};
pub use injury::{
    assess_occupants, classify_injuries, injury_band, ImpactSide, InjuryStatus, OccupantInjury,
    Seat, INJURY_G_THRESHOLDS, REAR_SEAT_G_FACTOR,
};
pub use input::{PedalInput, ScriptedDriver, BRAKE_INITIAL, BRAKE_RAMP_MS};
pub use lead::{
    apply_speed_limit, transition, LeadBehaviorState, LeadPhase, LeadVehicle, Transition,
    ACCELERATING_THROTTLE, CRUISE_BAND_KMH, MAX_EXCEED_FACTOR, MIN_EXCEED_FACTOR, MIN_SPEED_KMH,
    SPEED_LIMIT_BRAKE_INTENSITY, SPEED_LIMIT_REACTION_KMH,
};
pub use leaderboard::{Leaderboard, LeaderboardEntry, ResultSink, SessionResult};
pub use road_signs::{RoadSigns, MIN_SIGN_SPACING, SPEED_LIMITS_KMH};
pub use safety::{safe_distance, SafetyStatus, DANGER_FRACTION, MIN_SAFE_DISTANCE, REACTION_FACTOR};
pub use tailgater::{TailgaterConfig, TailgaterPolicy, TailgaterVehicle};
pub use types::{
    clamp_dt, kmh_to_ms, ms_to_kmh, DriverCommand, Traction, VehicleRole, Weather, GRAVITY,
    MAX_DT, MAX_VELOCITY, ROLLING_RESISTANCE,
};
pub use vehicle::{Vehicle, VehicleConfig, VehicleDynamicsModel};
pub use world::{Session, Snapshot};
