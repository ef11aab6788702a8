//! Speed-limit signs along the endless road

use anyhow::{ensure, Result};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Limits a sign can post, in km/h
pub const SPEED_LIMITS_KMH: [f32; 5] = [50.0, 70.0, 80.0, 100.0, 120.0];

/// Closest two signs may stand, in m
pub const MIN_SIGN_SPACING: f32 = 10.0;

/// Emits a new limit each time the lead passes a sign
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSigns {
    spacing: f32,
    next_sign_at: f32,
    current_limit: f32,
}

impl RoadSigns {
    pub fn new(spacing: f32, first_sign_at: f32, initial_limit: f32) -> Result<Self> {
        ensure!(
            spacing.is_finite() && spacing >= MIN_SIGN_SPACING,
            "sign spacing must be at least {} m, got {}",
            MIN_SIGN_SPACING,
            spacing
        );
        ensure!(first_sign_at.is_finite(), "first sign position must be finite");
        ensure!(
            initial_limit.is_finite() && initial_limit > 0.0,
            "speed limit must be positive, got {}",
            initial_limit
        );
        Ok(Self {
            spacing,
            next_sign_at: first_sign_at,
            current_limit: initial_limit,
        })
    }

    pub fn current_limit(&self) -> f32 {
        self.current_limit
    }

    pub fn next_sign_at(&self) -> f32 {
        self.next_sign_at
    }

    /// New limit if `position` has reached the next sign
    pub fn poll<R: Rng + ?Sized>(&mut self, position: f32, rng: &mut R) -> Option<f32> {
        if position.is_nan() || position < self.next_sign_at {
            return None;
        }
        // Skip every sign passed since the last poll in one step
        let passed = ((position - self.next_sign_at) / self.spacing).floor() + 1.0;
        let next = self.next_sign_at + passed * self.spacing;
        self.next_sign_at = if next > position {
            next
        } else {
            position + self.spacing
        };

        let current = self.current_limit;
        let choices: Vec<f32> = SPEED_LIMITS_KMH
            .iter()
            .copied()
            .filter(|&limit| limit != current)
            .collect();
        let limit = *choices.choose(rng)?;
        self.current_limit = limit;
        Some(limit)
    }
}
