//! Longitudinal vehicle dynamics for the following-distance simulation
//!
//! Every car on the road is a point mass moving along a single axis. Forces
//! from the throttle, the brakes, aerodynamic drag and rolling resistance are
//! integrated once per tick.

use anyhow::{ensure, Result};

use super::injury::Seat;
use super::types::{
    clamp_dt, DriverCommand, Traction, VehicleRole, GRAVITY, MAX_VELOCITY, ROLLING_RESISTANCE,
};

/// Construction parameters for a vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleConfig {
    /// Mass in kg
    pub mass: f32,
    /// Acceleration at full throttle in m/s²
    pub max_acceleration: f32,
    /// Brake force at full pedal on a dry road in N
    pub max_braking_force: f32,
    /// Lumped drag term, force = 0.5 * drag_coefficient * v * |v|
    pub drag_coefficient: f32,
    /// Starting distance along the road in m
    pub initial_position: f32,
    /// Starting speed in m/s
    pub initial_velocity: f32,
    /// Seats that carry an occupant
    pub occupants: Vec<Seat>,
}

impl VehicleConfig {
    pub fn player() -> Self {
        Self {
            mass: 1500.0,
            max_acceleration: 3.0,
            max_braking_force: 12_000.0,
            drag_coefficient: 0.8,
            initial_position: 0.0,
            initial_velocity: 0.0,
            occupants: vec![Seat::Driver],
        }
    }

    pub fn lead() -> Self {
        Self {
            mass: 1500.0,
            max_acceleration: 2.5,
            max_braking_force: 12_000.0,
            drag_coefficient: 0.8,
            initial_position: 40.0,
            initial_velocity: 0.0,
            occupants: vec![Seat::Driver, Seat::FrontPassenger, Seat::Rear],
        }
    }

    pub fn tailgater() -> Self {
        Self {
            mass: 1800.0,
            max_acceleration: 3.5,
            max_braking_force: 13_000.0,
            drag_coefficient: 0.9,
            initial_position: 0.0,
            initial_velocity: 0.0,
            occupants: vec![Seat::Driver, Seat::Rear],
        }
    }

    /// Reject parameters the integrator cannot work with
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.mass.is_finite() && self.mass > 0.0,
            "vehicle mass must be positive, got {}",
            self.mass
        );
        ensure!(
            self.max_acceleration.is_finite() && self.max_acceleration > 0.0,
            "max acceleration must be positive, got {}",
            self.max_acceleration
        );
        ensure!(
            self.max_braking_force.is_finite() && self.max_braking_force > 0.0,
            "max braking force must be positive, got {}",
            self.max_braking_force
        );
        ensure!(
            self.drag_coefficient.is_finite() && self.drag_coefficient >= 0.0,
            "drag coefficient must not be negative, got {}",
            self.drag_coefficient
        );
        ensure!(
            self.initial_position.is_finite(),
            "initial position must be finite"
        );
        ensure!(
            (0.0..=MAX_VELOCITY).contains(&self.initial_velocity),
            "initial velocity must be in [0, {}], got {}",
            MAX_VELOCITY,
            self.initial_velocity
        );
        ensure!(!self.occupants.is_empty(), "a vehicle needs at least a driver");
        Ok(())
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self::player()
    }
}

/// A vehicle on the road
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    role: VehicleRole,
    mass: f32,
    position: f32,
    velocity: f32,
    max_acceleration: f32,
    max_braking_force: f32,
    drag_coefficient: f32,
    current_throttle: f32,
    current_brake: f32,
    occupants: Vec<Seat>,
}

impl Vehicle {
    pub fn new(role: VehicleRole, config: &VehicleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            role,
            mass: config.mass,
            position: config.initial_position,
            velocity: config.initial_velocity,
            max_acceleration: config.max_acceleration,
            max_braking_force: config.max_braking_force,
            drag_coefficient: config.drag_coefficient,
            current_throttle: 0.0,
            current_brake: 0.0,
            occupants: config.occupants.clone(),
        })
    }

    pub fn role(&self) -> VehicleRole {
        self.role
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn throttle(&self) -> f32 {
        self.current_throttle
    }

    pub fn brake(&self) -> f32 {
        self.current_brake
    }

    pub fn occupants(&self) -> &[Seat] {
        &self.occupants
    }

    /// Drag plus rolling resistance at the current speed, in N
    pub fn resistive_force(&self) -> f32 {
        let v = self.velocity;
        let drag = 0.5 * self.drag_coefficient * v * v.abs();
        let rolling = if v > 0.0 {
            ROLLING_RESISTANCE * self.mass * GRAVITY
        } else {
            0.0
        };
        drag + rolling
    }

    pub(crate) fn set_velocity(&mut self, velocity: f32) {
        self.velocity = if velocity.is_finite() {
            velocity.clamp(0.0, MAX_VELOCITY)
        } else {
            0.0
        };
    }

    pub(crate) fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

/// Integrates driver input into a vehicle's motion
///
/// The model is the only writer of its vehicle's position and velocity,
/// apart from the collision resolver overwriting velocity at impact.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDynamicsModel {
    vehicle: Vehicle,
    /// Set once the vehicle has crashed; driver input is ignored from then on
    inputs_locked: bool,
}

impl VehicleDynamicsModel {
    pub fn new(role: VehicleRole, config: &VehicleConfig) -> Result<Self> {
        Ok(Self {
            vehicle: Vehicle::new(role, config)?,
            inputs_locked: false,
        })
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn velocity(&self) -> f32 {
        self.vehicle.velocity
    }

    pub fn position(&self) -> f32 {
        self.vehicle.position
    }

    pub fn is_coasting(&self) -> bool {
        self.inputs_locked
    }

    pub fn set_throttle(&mut self, throttle: f32) {
        if self.inputs_locked {
            return;
        }
        self.vehicle.current_throttle = clamp_unit(throttle);
    }

    pub fn set_brake(&mut self, brake: f32) {
        if self.inputs_locked {
            return;
        }
        self.vehicle.current_brake = clamp_unit(brake);
    }

    pub fn apply(&mut self, command: DriverCommand) {
        self.set_throttle(command.throttle);
        self.set_brake(command.brake);
    }

    /// Throttle that balances drag and rolling resistance at the current speed
    pub fn holding_throttle(&self) -> f32 {
        let full = self.vehicle.max_acceleration * self.vehicle.mass;
        clamp_unit(self.vehicle.resistive_force() / full)
    }

    /// Advance the vehicle by one tick
    pub fn update(&mut self, dt: f32, traction: Traction) {
        let dt = clamp_dt(dt);
        if dt == 0.0 {
            return;
        }

        let vehicle = &mut self.vehicle;
        let drive = vehicle.current_throttle * vehicle.max_acceleration * vehicle.mass;
        // Wet or icy roads weaken the brakes, the engine is unaffected
        let braking = vehicle.max_braking_force * vehicle.current_brake * traction.value();
        let force = drive - braking - vehicle.resistive_force();

        let acceleration = force / vehicle.mass;
        vehicle.set_velocity(vehicle.velocity + acceleration * dt);
        vehicle.advance(dt);
    }

    /// Advance by a directly commanded acceleration instead of the force balance
    ///
    /// Used by drivers that steer their speed with a kinematic heuristic.
    /// Once the vehicle has crashed it falls back to coasting.
    pub fn update_kinematic(&mut self, dt: f32, acceleration: f32, traction: Traction) {
        if self.inputs_locked {
            self.update(dt, traction);
            return;
        }
        let dt = clamp_dt(dt);
        if dt == 0.0 || !acceleration.is_finite() {
            return;
        }
        let vehicle = &mut self.vehicle;
        vehicle.set_velocity(vehicle.velocity + acceleration * dt);
        vehicle.advance(dt);
    }

    /// Overwrite velocity at the instant of impact and drop all driver input
    pub(crate) fn apply_impact(&mut self, velocity: f32) {
        self.vehicle.set_velocity(velocity);
        self.lock_inputs();
    }

    pub(crate) fn lock_inputs(&mut self) {
        self.vehicle.current_throttle = 0.0;
        self.vehicle.current_brake = 0.0;
        self.inputs_locked = true;
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
