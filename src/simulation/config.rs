//! Session configuration

use anyhow::{ensure, Context, Result};

use super::road_signs::MIN_SIGN_SPACING;
use super::tailgater::TailgaterConfig;
use super::types::Weather;
use super::vehicle::VehicleConfig;

/// Everything needed to build a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub player: VehicleConfig,
    pub lead: VehicleConfig,
    /// `None` keeps the road behind the player empty
    pub tailgater: Option<TailgaterConfig>,
    pub weather: Weather,
    /// Posted limit at the start, in km/h
    pub initial_speed_limit: f32,
    /// Distance between speed-limit signs, in m
    pub sign_spacing: f32,
    /// Fixed seed for reproducible sessions
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player: VehicleConfig::player(),
            lead: VehicleConfig::lead(),
            tailgater: None,
            weather: Weather::Clear,
            initial_speed_limit: 80.0,
            sign_spacing: 800.0,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_tailgater(mut self, tailgater: TailgaterConfig) -> Self {
        self.tailgater = Some(tailgater);
        self
    }

    /// Reject configurations that would break the simulation
    pub fn validate(&self) -> Result<()> {
        self.player.validate().context("invalid player vehicle")?;
        self.lead.validate().context("invalid lead vehicle")?;
        if let Some(tailgater) = &self.tailgater {
            tailgater.validate().context("invalid tailgater")?;
        }
        ensure!(
            self.lead.initial_position > self.player.initial_position,
            "lead must start ahead of the player"
        );
        ensure!(
            self.initial_speed_limit.is_finite() && self.initial_speed_limit > 0.0,
            "speed limit must be positive, got {}",
            self.initial_speed_limit
        );
        ensure!(
            self.sign_spacing.is_finite() && self.sign_spacing >= MIN_SIGN_SPACING,
            "sign spacing must be at least {} m, got {}",
            MIN_SIGN_SPACING,
            self.sign_spacing
        );
        Ok(())
    }
}
