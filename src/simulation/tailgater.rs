//! The tailgater behind the player
//!
//! The tailgater does not use the force-balance driver of the other cars.
//! Its driver picks an acceleration directly from the gap to the player,
//! and it deliberately sits at half the safe distance.

use anyhow::{ensure, Result};
use log::info;

use super::safety::safe_distance;
use super::types::{Traction, VehicleRole};
use super::vehicle::{Vehicle, VehicleConfig, VehicleDynamicsModel};

/// Kinematic accel/brake heuristic used by the tailgater
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailgaterPolicy {
    /// Fraction of the safe distance the tailgater tries to keep
    pub follow_fraction: f32,
    /// Acceleration used to close a large gap, in m/s²
    pub catch_up_acceleration: f32,
    /// Deceleration at full alarm on a dry road, in m/s²
    pub max_deceleration: f32,
    /// Gain on the speed difference while holding the gap
    pub speed_match_gain: f32,
}

impl Default for TailgaterPolicy {
    fn default() -> Self {
        Self {
            follow_fraction: 0.5,
            catch_up_acceleration: 2.5,
            max_deceleration: 7.0,
            speed_match_gain: 0.8,
        }
    }
}

impl TailgaterPolicy {
    /// Gap the tailgater aims for at its current speed
    pub fn desired_gap(&self, own_speed: f32, traction: Traction) -> f32 {
        safe_distance(own_speed, traction) * self.follow_fraction
    }

    /// Commanded acceleration in m/s²
    pub fn acceleration(
        &self,
        gap: f32,
        own_speed: f32,
        player_speed: f32,
        traction: Traction,
    ) -> f32 {
        let desired = self.desired_gap(own_speed, traction);
        let braking = self.max_deceleration * traction.value();

        if gap > desired * 1.2 {
            self.catch_up_acceleration
        } else if gap < desired {
            let urgency = ((desired - gap) / desired).clamp(0.3, 1.0);
            -braking * urgency
        } else {
            (self.speed_match_gain * (player_speed - own_speed))
                .clamp(-braking, self.catch_up_acceleration)
        }
    }
}

/// When and how the tailgater shows up
#[derive(Debug, Clone, PartialEq)]
pub struct TailgaterConfig {
    pub vehicle: VehicleConfig,
    pub policy: TailgaterPolicy,
    /// Session time before the tailgater appears, in s
    pub spawn_after: f32,
    /// Distance behind the player at spawn, in m
    pub spawn_gap: f32,
}

impl Default for TailgaterConfig {
    fn default() -> Self {
        Self {
            vehicle: VehicleConfig::tailgater(),
            policy: TailgaterPolicy::default(),
            spawn_after: 20.0,
            spawn_gap: 30.0,
        }
    }
}

impl TailgaterConfig {
    pub fn validate(&self) -> Result<()> {
        self.vehicle.validate()?;
        ensure!(
            self.spawn_after.is_finite() && self.spawn_after >= 0.0,
            "tailgater spawn delay must not be negative"
        );
        ensure!(
            self.spawn_gap.is_finite() && self.spawn_gap > 0.0,
            "tailgater spawn gap must be positive"
        );
        ensure!(
            self.policy.follow_fraction > 0.0,
            "tailgater follow fraction must be positive"
        );
        Ok(())
    }
}

/// A tailgating car following the player
#[derive(Debug, Clone)]
pub struct TailgaterVehicle {
    dynamics: VehicleDynamicsModel,
    policy: TailgaterPolicy,
}

impl TailgaterVehicle {
    /// Place a tailgater `spawn_gap` behind the player at the player's speed
    pub fn spawn(config: &TailgaterConfig, player: &Vehicle) -> Result<Self> {
        let mut vehicle = config.vehicle.clone();
        vehicle.initial_position = player.position() - config.spawn_gap;
        vehicle.initial_velocity = player.velocity();

        info!(
            "Tailgater appeared {:.0} m behind the player",
            config.spawn_gap
        );
        Ok(Self {
            dynamics: VehicleDynamicsModel::new(VehicleRole::Tailgater, &vehicle)?,
            policy: config.policy,
        })
    }

    pub fn dynamics(&self) -> &VehicleDynamicsModel {
        &self.dynamics
    }

    pub(crate) fn dynamics_mut(&mut self) -> &mut VehicleDynamicsModel {
        &mut self.dynamics
    }

    pub fn gap_to(&self, player: &Vehicle) -> f32 {
        player.position() - self.dynamics.position()
    }

    pub fn tick(&mut self, dt: f32, player: &Vehicle, traction: Traction) {
        let acceleration = self.policy.acceleration(
            self.gap_to(player),
            self.dynamics.velocity(),
            player.velocity(),
            traction,
        );
        self.dynamics.update_kinematic(dt, acceleration, traction);
    }
}
