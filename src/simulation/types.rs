//! Core types for the following-distance simulation
//!
//! Units, physical constants and the environment signal shared by every
//! component.

use anyhow::{ensure, Result};
use clap::ValueEnum;

/// Top speed of any vehicle in m/s (250 km/h)
pub const MAX_VELOCITY: f32 = 69.4;

/// Largest time step handed to any integrator, in seconds
pub const MAX_DT: f32 = 0.1;

/// Gravitational acceleration in m/s²
pub const GRAVITY: f32 = 9.81;

/// Rolling resistance coefficient applied while a vehicle is moving
pub const ROLLING_RESISTANCE: f32 = 0.003;

/// Convert km/h to m/s
pub fn kmh_to_ms(kmh: f32) -> f32 {
    kmh / 3.6
}

/// Convert m/s to km/h
pub fn ms_to_kmh(ms: f32) -> f32 {
    ms * 3.6
}

/// Clamp a frame delta into the range an integrator accepts
pub fn clamp_dt(delta_secs: f32) -> f32 {
    if delta_secs.is_finite() {
        delta_secs.clamp(0.0, MAX_DT)
    } else {
        0.0
    }
}

/// Road grip multiplier in (0, 1]
///
/// Scales braking force and stretches braking distance. Zero or negative
/// values are rejected at construction because the braking-distance term
/// divides by it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Traction(f32);

impl Traction {
    pub const DRY: Traction = Traction(1.0);

    pub fn new(value: f32) -> Result<Self> {
        ensure!(
            value.is_finite() && value > 0.0 && value <= 1.0,
            "traction must be in (0, 1], got {}",
            value
        );
        Ok(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Traction {
    fn default() -> Self {
        Self::DRY
    }
}

/// Weather condition driving the traction signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Weather {
    #[default]
    Clear,
    Fog,
    Rain,
    Snow,
    Ice,
}

impl Weather {
    pub fn traction(self) -> Traction {
        // All values sit inside (0.4, 1.0]
        match self {
            Weather::Clear => Traction(1.0),
            Weather::Fog => Traction(0.85),
            Weather::Rain => Traction(0.7),
            Weather::Snow => Traction(0.55),
            Weather::Ice => Traction(0.45),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Fog => "fog",
            Weather::Rain => "rain",
            Weather::Snow => "snow",
            Weather::Ice => "ice",
        }
    }
}

/// Role a vehicle plays on the road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleRole {
    /// The car driven by the player
    Player,
    /// The autonomous car in front of the player
    Lead,
    /// The aggressive car that can appear behind the player
    Tailgater,
}

impl VehicleRole {
    pub fn label(self) -> &'static str {
        match self {
            VehicleRole::Player => "player",
            VehicleRole::Lead => "lead",
            VehicleRole::Tailgater => "tailgater",
        }
    }
}

/// Throttle and brake request produced by a driver for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriverCommand {
    pub throttle: f32,
    pub brake: f32,
}

impl DriverCommand {
    pub fn throttle(throttle: f32) -> Self {
        Self {
            throttle,
            brake: 0.0,
        }
    }

    pub fn brake(brake: f32) -> Self {
        Self {
            throttle: 0.0,
            brake,
        }
    }

    pub fn coast() -> Self {
        Self::default()
    }
}
