//! Autonomous lead vehicle
//!
//! The car in front of the player is driven by a three-state machine:
//! accelerate to a target speed, cruise around it for a while, then either
//! brake unexpectedly or pick a new target. Bad weather shortens the cruise
//! windows and makes the braking harder, since a driver who sees less reacts
//! later.
//!
//! Transitions are computed by [`transition`], a pure function of the current
//! state, the vehicle's speed, the traction and a caller supplied random
//! source. [`LeadVehicle`] applies the result to its dynamics model.

use anyhow::{ensure, Result};
use log::{debug, info, warn};
use rand::Rng;

use super::types::{kmh_to_ms, ms_to_kmh, DriverCommand, Traction, VehicleRole};
use super::vehicle::{VehicleConfig, VehicleDynamicsModel};

/// Throttle held while accelerating towards the target speed
pub const ACCELERATING_THROTTLE: f32 = 0.5;

/// Half width of the cruise band around the target speed, in km/h
pub const CRUISE_BAND_KMH: f32 = 5.0;

/// Braking ends early once the lead drops below this speed, in km/h
pub const MIN_SPEED_KMH: f32 = 30.0;

/// Cruise dwell lower bound on a dry road, in seconds
pub const BASE_MIN_CRUISE_TIME: f32 = 3.0;

/// Cruise dwell random spread on a dry road, in seconds
pub const BASE_CRUISE_TIME_RANGE: f32 = 5.0;

/// Braking window is `BRAKING_TIME_MIN + rand * BRAKING_TIME_RANGE` seconds
pub const BRAKING_TIME_MIN: f32 = 2.0;
pub const BRAKING_TIME_RANGE: f32 = 2.0;

/// Bounds for how far over the posted limit the lead is willing to drive
pub const MIN_EXCEED_FACTOR: f32 = 1.0;
pub const MAX_EXCEED_FACTOR: f32 = 1.3;

/// Chance that a new target speed is the maximum the lead allows itself
pub const OVER_LIMIT_BIAS: f64 = 0.3;

/// A speed-limit change forces a reaction when the lead is further than this
/// from its new maximum, in km/h
pub const SPEED_LIMIT_REACTION_KMH: f32 = 10.0;

/// Brake pedal used when a new, lower speed limit forces a slowdown
pub const SPEED_LIMIT_BRAKE_INTENSITY: f32 = 0.5;

const CRUISE_CORRECTION_THROTTLE: f32 = 0.3;
const CRUISE_CORRECTION_BRAKE: f32 = 0.15;
const CRUISE_GAIN: f32 = 0.05;

/// Phase of the lead driver, with the data only that phase needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeadPhase {
    Accelerating,
    /// Hold the target speed for `dwell` seconds
    Cruising { dwell: f32 },
    /// Brake at `intensity` for up to `duration` seconds
    Braking { intensity: f32, duration: f32 },
}

/// Full behavior state of the lead driver
#[derive(Debug, Clone, PartialEq)]
pub struct LeadBehaviorState {
    pub phase: LeadPhase,
    /// Speed the driver is aiming for, in m/s
    pub target_speed: f32,
    /// Seconds spent in the current phase
    pub state_timer: f32,
    /// Posted limit in km/h
    pub speed_limit: f32,
    /// How far over the limit the driver will go, in [1.0, 1.3]
    pub exceed_factor: f32,
}

impl LeadBehaviorState {
    /// Fresh state for a lead car that starts accelerating under `speed_limit`
    pub fn new<R: Rng + ?Sized>(speed_limit: f32, rng: &mut R) -> Self {
        let mut state = Self {
            phase: LeadPhase::Accelerating,
            target_speed: 0.0,
            state_timer: 0.0,
            speed_limit,
            exceed_factor: roll_exceed_factor(rng),
        };
        state.target_speed = roll_target_speed(&state, rng);
        state
    }

    /// Highest speed the driver allows itself under the current limit, in m/s
    pub fn max_allowed_speed(&self) -> f32 {
        kmh_to_ms(self.speed_limit * self.exceed_factor)
    }

    pub fn braking_intensity(&self) -> Option<f32> {
        match self.phase {
            LeadPhase::Braking { intensity, .. } => Some(intensity),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.phase {
            LeadPhase::Accelerating => "ACCELERATING",
            LeadPhase::Cruising { .. } => "CRUISING",
            LeadPhase::Braking { .. } => "BRAKING",
        }
    }

    fn enter(&mut self, phase: LeadPhase) {
        self.phase = phase;
        self.state_timer = 0.0;
    }
}

/// Outcome of one behavior step
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: LeadBehaviorState,
    pub command: DriverCommand,
}

/// Advance the behavior state machine by one tick
///
/// `holding_throttle` is the throttle that cancels drag at the current speed;
/// the cruise controller uses it as its feed-forward term.
pub fn transition<R: Rng + ?Sized>(
    state: &LeadBehaviorState,
    velocity: f32,
    holding_throttle: f32,
    traction: Traction,
    dt: f32,
    rng: &mut R,
) -> Transition {
    let mut next = state.clone();
    next.state_timer += dt;

    let command = match state.phase {
        LeadPhase::Accelerating => {
            if velocity >= state.target_speed {
                next.enter(LeadPhase::Cruising {
                    dwell: roll_cruise_dwell(traction, rng),
                });
                cruise_command(velocity, next.target_speed, holding_throttle)
            } else {
                DriverCommand::throttle(ACCELERATING_THROTTLE)
            }
        }
        LeadPhase::Cruising { dwell } => {
            if next.state_timer >= dwell {
                let brake_chance = 0.5 + (1.0 - traction.value()) * 0.3;
                if rng.random::<f32>() < brake_chance {
                    let intensity = roll_braking_intensity(traction, rng);
                    next.enter(LeadPhase::Braking {
                        intensity,
                        duration: roll_braking_duration(rng),
                    });
                    DriverCommand::brake(intensity)
                } else {
                    next.target_speed = roll_target_speed(&next, rng);
                    next.enter(LeadPhase::Accelerating);
                    DriverCommand::throttle(ACCELERATING_THROTTLE)
                }
            } else {
                cruise_command(velocity, next.target_speed, holding_throttle)
            }
        }
        LeadPhase::Braking {
            intensity,
            duration,
        } => {
            if next.state_timer >= duration || velocity < kmh_to_ms(MIN_SPEED_KMH) {
                next.target_speed = roll_target_speed(&next, rng);
                next.enter(LeadPhase::Accelerating);
                DriverCommand::throttle(ACCELERATING_THROTTLE)
            } else {
                DriverCommand::brake(intensity)
            }
        }
    };

    Transition {
        state: next,
        command,
    }
}

/// React to a new posted limit
///
/// Re-rolls the exceed factor and target speed. Forces braking or
/// accelerating at once when the current speed is far from the new maximum,
/// otherwise the phase is left alone.
pub fn apply_speed_limit<R: Rng + ?Sized>(
    state: &LeadBehaviorState,
    speed_limit: f32,
    velocity: f32,
    rng: &mut R,
) -> LeadBehaviorState {
    let mut next = state.clone();
    next.speed_limit = speed_limit;
    next.exceed_factor = roll_exceed_factor(rng);
    next.target_speed = next.max_allowed_speed();

    let excess_kmh = ms_to_kmh(velocity) - ms_to_kmh(next.max_allowed_speed());
    if excess_kmh > SPEED_LIMIT_REACTION_KMH {
        next.enter(LeadPhase::Braking {
            intensity: SPEED_LIMIT_BRAKE_INTENSITY,
            duration: roll_braking_duration(rng),
        });
    } else if excess_kmh < -SPEED_LIMIT_REACTION_KMH {
        next.enter(LeadPhase::Accelerating);
    }
    next
}

fn cruise_command(velocity: f32, target_speed: f32, holding_throttle: f32) -> DriverCommand {
    let band = kmh_to_ms(CRUISE_BAND_KMH);
    if velocity < target_speed - band {
        DriverCommand::throttle(CRUISE_CORRECTION_THROTTLE.max(holding_throttle))
    } else if velocity > target_speed + band {
        DriverCommand::brake(CRUISE_CORRECTION_BRAKE)
    } else {
        let throttle = holding_throttle + CRUISE_GAIN * (target_speed - velocity);
        DriverCommand::throttle(throttle.clamp(0.0, 1.0))
    }
}

fn roll_exceed_factor<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(MIN_EXCEED_FACTOR..=MAX_EXCEED_FACTOR)
}

fn roll_target_speed<R: Rng + ?Sized>(state: &LeadBehaviorState, rng: &mut R) -> f32 {
    let max_allowed = state.max_allowed_speed();
    if rng.random_bool(OVER_LIMIT_BIAS) {
        return max_allowed;
    }
    let floor = kmh_to_ms(MIN_SPEED_KMH)
        .max(kmh_to_ms(state.speed_limit) * 0.8)
        .min(max_allowed);
    rng.random_range(floor..=max_allowed)
}

fn roll_cruise_dwell<R: Rng + ?Sized>(traction: Traction, rng: &mut R) -> f32 {
    let t = traction.value();
    let min_cruise_time = BASE_MIN_CRUISE_TIME * t;
    let cruise_time_range = BASE_CRUISE_TIME_RANGE * t;
    min_cruise_time + rng.random::<f32>() * cruise_time_range
}

fn roll_braking_intensity<R: Rng + ?Sized>(traction: Traction, rng: &mut R) -> f32 {
    let min_intensity = 0.1 + (1.0 - traction.value()) * 0.3;
    min_intensity + rng.random::<f32>() * (1.0 - min_intensity)
}

fn roll_braking_duration<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    BRAKING_TIME_MIN + rng.random::<f32>() * BRAKING_TIME_RANGE
}

/// The lead car: a dynamics model driven by the behavior state machine
#[derive(Debug, Clone)]
pub struct LeadVehicle {
    dynamics: VehicleDynamicsModel,
    state: LeadBehaviorState,
}

impl LeadVehicle {
    pub fn new<R: Rng + ?Sized>(
        config: &VehicleConfig,
        speed_limit: f32,
        rng: &mut R,
    ) -> Result<Self> {
        ensure!(
            speed_limit.is_finite() && speed_limit > 0.0,
            "speed limit must be positive, got {}",
            speed_limit
        );
        Ok(Self {
            dynamics: VehicleDynamicsModel::new(VehicleRole::Lead, config)?,
            state: LeadBehaviorState::new(speed_limit, rng),
        })
    }

    pub fn dynamics(&self) -> &VehicleDynamicsModel {
        &self.dynamics
    }

    pub(crate) fn dynamics_mut(&mut self) -> &mut VehicleDynamicsModel {
        &mut self.dynamics
    }

    pub fn state(&self) -> &LeadBehaviorState {
        &self.state
    }

    /// Run the driver and then the physics for one tick
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, traction: Traction, rng: &mut R) {
        if !self.dynamics.is_coasting() {
            let result = transition(
                &self.state,
                self.dynamics.velocity(),
                self.dynamics.holding_throttle(),
                traction,
                dt,
                rng,
            );
            if result.state.label() != self.state.label() {
                debug!(
                    "Lead {} -> {} at {:.1} km/h (target {:.1} km/h)",
                    self.state.label(),
                    result.state.label(),
                    ms_to_kmh(self.dynamics.velocity()),
                    ms_to_kmh(result.state.target_speed)
                );
            }
            self.state = result.state;
            self.dynamics.apply(result.command);
        }
        self.dynamics.update(dt, traction);
    }

    /// Road-sign event: a new posted limit in km/h
    pub fn set_speed_limit<R: Rng + ?Sized>(&mut self, speed_limit: f32, rng: &mut R) {
        if !speed_limit.is_finite() || speed_limit <= 0.0 {
            warn!("Ignoring invalid speed limit {}", speed_limit);
            return;
        }
        let previous = self.state.label();
        self.state = apply_speed_limit(&self.state, speed_limit, self.dynamics.velocity(), rng);
        info!(
            "Speed limit now {:.0} km/h, lead aiming for {:.1} km/h ({} -> {})",
            speed_limit,
            ms_to_kmh(self.state.target_speed),
            previous,
            self.state.label()
        );
    }
}
