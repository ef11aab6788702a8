//! Safe following distance
//!
//! Pure functions of speed and traction, shared by scoring, the warning
//! state and the tailgater's target gap.

use super::types::Traction;

/// Smallest gap ever considered safe, in m
pub const MIN_SAFE_DISTANCE: f32 = 10.0;

/// Seconds of travel covered while the driver reacts
pub const REACTION_FACTOR: f32 = 1.0;

/// Gap below which the warning escalates from caution to danger, as a
/// fraction of the safe distance
pub const DANGER_FRACTION: f32 = 0.5;

/// Minimum safe gap for a follower travelling at `velocity` m/s
pub fn safe_distance(velocity: f32, traction: Traction) -> f32 {
    let v = velocity.max(0.0);
    let reaction = v * REACTION_FACTOR;
    let braking = v * (0.5 / traction.value());
    (reaction + braking).max(MIN_SAFE_DISTANCE)
}

/// Warning level shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SafetyStatus {
    Safe,
    Caution,
    Danger,
}

impl SafetyStatus {
    pub fn evaluate(gap: f32, safe_distance: f32) -> Self {
        if gap < safe_distance * DANGER_FRACTION {
            SafetyStatus::Danger
        } else if gap < safe_distance {
            SafetyStatus::Caution
        } else {
            SafetyStatus::Safe
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SafetyStatus::Safe => "SAFE",
            SafetyStatus::Caution => "CAUTION",
            SafetyStatus::Danger => "DANGER",
        }
    }
}
