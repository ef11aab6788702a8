//! Pedal input
//!
//! Normalises raw key or touch state into throttle and brake values. The
//! throttle is on or off; the brake starts at 10% when pressed and ramps to
//! full over one second of holding.

use super::safety::safe_distance;
use super::types::{clamp_dt, DriverCommand, Traction};

/// Brake value the instant the pedal is pressed
pub const BRAKE_INITIAL: f32 = 0.1;

/// Hold time to reach full brake, in ms
pub const BRAKE_RAMP_MS: f32 = 1000.0;

/// Throttle and brake pedals as seen by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PedalInput {
    throttle_held: bool,
    /// How long the brake has been held, in ms; `None` when released
    brake_held_ms: Option<f32>,
}

impl PedalInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold_throttle(&mut self) {
        self.throttle_held = true;
    }

    pub fn release_throttle(&mut self) {
        self.throttle_held = false;
    }

    pub fn hold_brake(&mut self) {
        if self.brake_held_ms.is_none() {
            self.brake_held_ms = Some(0.0);
        }
    }

    pub fn release_brake(&mut self) {
        self.brake_held_ms = None;
    }

    /// Advance the brake ramp by `delta_secs`
    pub fn update(&mut self, delta_secs: f32) {
        if let Some(held) = self.brake_held_ms.as_mut() {
            *held = (*held + delta_secs.max(0.0) * 1000.0).min(BRAKE_RAMP_MS);
        }
    }

    /// 0 or 1
    pub fn throttle(&self) -> f32 {
        if self.throttle_held {
            1.0
        } else {
            0.0
        }
    }

    /// 0 when released, otherwise in [0.1, 1.0]
    pub fn brake(&self) -> f32 {
        match self.brake_held_ms {
            None => 0.0,
            Some(held) => {
                let ramp = (held / BRAKE_RAMP_MS).clamp(0.0, 1.0);
                BRAKE_INITIAL + (1.0 - BRAKE_INITIAL) * ramp
            }
        }
    }

    /// Current pedal positions as a command for the player's car
    pub fn command(&self) -> DriverCommand {
        DriverCommand {
            throttle: self.throttle(),
            brake: self.brake(),
        }
    }
}

/// Headless stand-in for a human player
///
/// Keeps the gap near `follow_factor` times the safe distance: throttle when
/// well behind that, brake when inside it, coast in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedDriver {
    pub follow_factor: f32,
}

impl Default for ScriptedDriver {
    fn default() -> Self {
        Self { follow_factor: 1.2 }
    }
}

impl ScriptedDriver {
    pub fn new(follow_factor: f32) -> Self {
        Self { follow_factor }
    }

    /// Press or release pedals for this tick
    pub fn drive(&self, input: &mut PedalInput, gap: f32, velocity: f32, traction: Traction) {
        let target = safe_distance(velocity, traction) * self.follow_factor;
        if gap > target * 1.1 {
            input.release_brake();
            input.hold_throttle();
        } else if gap < target {
            input.release_throttle();
            input.hold_brake();
        } else {
            input.release_throttle();
            input.release_brake();
        }
    }

    /// Drive one tick and return the pedals it sends
    ///
    /// The command is read before the brake ramp advances, so a fresh press
    /// sends the initial brake value. The ramp advances by the same clamped
    /// delta the session integrates.
    pub fn step(
        &self,
        input: &mut PedalInput,
        gap: f32,
        velocity: f32,
        traction: Traction,
        delta_secs: f32,
    ) -> DriverCommand {
        self.drive(input, gap, velocity, traction);
        let command = input.command();
        input.update(clamp_dt(delta_secs));
        command
    }
}
