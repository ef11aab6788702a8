//! A driving session that ties everything together
//!
//! This is the entry point for running the following-distance simulation
//! without any renderer. One call to [`Session::tick`] runs the fixed order:
//! player dynamics, lead behavior (and the tailgater), collision check,
//! then safe distance and score.

use anyhow::Result;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::collision::{CollisionEvent, CollisionResolver};
use super::config::SessionConfig;
use super::game_state::GameState;
use super::lead::LeadVehicle;
use super::leaderboard::SessionResult;
use super::road_signs::RoadSigns;
use super::safety::{safe_distance, SafetyStatus};
use super::tailgater::TailgaterVehicle;
use super::types::{clamp_dt, ms_to_kmh, DriverCommand, Traction, VehicleRole};
use super::vehicle::VehicleDynamicsModel;

/// Read-only view of a session handed to renderers and the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub time: f32,
    pub player_velocity: f32,
    pub player_position: f32,
    pub lead_velocity: f32,
    pub lead_position: f32,
    /// Position and velocity of the tailgater once it has appeared
    pub tailgater: Option<(f32, f32)>,
    pub lead_state: &'static str,
    pub speed_limit: f32,
    /// Gap from the player to the lead, in m
    pub distance: f32,
    pub safe_distance: f32,
    pub safety: SafetyStatus,
    pub score: f32,
    pub collision: Option<CollisionEvent>,
}

/// One run from the start line to the crash (or until the caller stops)
pub struct Session {
    config: SessionConfig,

    player: VehicleDynamicsModel,

    lead: LeadVehicle,

    /// Appears after the configured delay when enabled
    tailgater: Option<TailgaterVehicle>,

    resolver: CollisionResolver,

    road_signs: RoadSigns,

    /// Set by the one collision a session can have
    collision: Option<CollisionEvent>,

    pub game_state: GameState,

    /// Safe distance computed on the latest tick
    safe_distance: f32,

    /// Simulation time
    pub time: f32,

    pub tick_count: u64,

    rng: StdRng,
}

impl Session {
    /// Build a session, rejecting invalid configuration before anything runs
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let player = VehicleDynamicsModel::new(VehicleRole::Player, &config.player)?;
        let lead = LeadVehicle::new(&config.lead, config.initial_speed_limit, &mut rng)?;
        let road_signs = RoadSigns::new(
            config.sign_spacing,
            config.lead.initial_position + config.sign_spacing,
            config.initial_speed_limit,
        )?;
        let traction = config.weather.traction();
        let safe = safe_distance(player.velocity(), traction);

        info!(
            "Session start: weather={} traction={:.2} limit={:.0} km/h seed={}",
            config.weather.label(),
            traction.value(),
            config.initial_speed_limit,
            config
                .seed
                .map_or_else(|| "random".to_string(), |s| s.to_string())
        );

        Ok(Self {
            config,
            player,
            lead,
            tailgater: None,
            resolver: CollisionResolver::new(),
            road_signs,
            collision: None,
            game_state: GameState::new(),
            safe_distance: safe,
            time: 0.0,
            tick_count: 0,
            rng,
        })
    }

    /// Throw away all state and start over from the configuration
    ///
    /// A seeded session replays identically after a restart.
    pub fn restart(&mut self) -> Result<()> {
        *self = Self::new(self.config.clone())?;
        Ok(())
    }

    /// Traction of the configured weather
    pub fn traction(&self) -> Traction {
        self.config.weather.traction()
    }

    pub fn player(&self) -> &VehicleDynamicsModel {
        &self.player
    }

    pub fn lead(&self) -> &LeadVehicle {
        &self.lead
    }

    pub fn tailgater(&self) -> Option<&TailgaterVehicle> {
        self.tailgater.as_ref()
    }

    pub fn collision(&self) -> Option<&CollisionEvent> {
        self.collision.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.collision.is_some()
    }

    /// Gap from the player to the lead, in m
    pub fn distance(&self) -> f32 {
        self.lead.dynamics().position() - self.player.position()
    }

    pub fn safe_distance(&self) -> f32 {
        self.safe_distance
    }

    /// Road-sign event, normally raised by the session's own signs
    ///
    /// Ignored once the session is over.
    pub fn set_speed_limit(&mut self, speed_limit: f32) {
        if self.is_over() {
            return;
        }
        self.lead.set_speed_limit(speed_limit, &mut self.rng);
    }

    /// Advance the session by one frame
    ///
    /// Returns the collision event on the tick it happens.
    pub fn tick(
        &mut self,
        delta_secs: f32,
        input: DriverCommand,
        traction: Traction,
    ) -> Option<CollisionEvent> {
        let dt = clamp_dt(delta_secs);
        self.time += dt;
        self.tick_count += 1;

        // Player
        self.player.apply(input);
        self.player.update(dt, traction);

        // Lead, after any sign it has just passed; signs stop mattering after a crash
        if self.collision.is_none() {
            if let Some(limit) = self
                .road_signs
                .poll(self.lead.dynamics().position(), &mut self.rng)
            {
                self.lead.set_speed_limit(limit, &mut self.rng);
            }
        }
        self.lead.tick(dt, traction, &mut self.rng);

        // Tailgater
        self.update_tailgater(dt, traction);

        // Collision
        let event = self.resolver.check(
            &mut self.player,
            self.lead.dynamics_mut(),
            self.tailgater.as_mut().map(|t| t.dynamics_mut()),
        );
        if let Some(event) = &event {
            self.log_collision(event);
            self.game_state.end();
            self.collision = Some(event.clone());
        }

        // Distance and score
        self.safe_distance = safe_distance(self.player.velocity(), traction);
        self.game_state.update(
            dt,
            self.distance(),
            self.safe_distance,
            self.player.velocity(),
        );

        event
    }

    fn update_tailgater(&mut self, dt: f32, traction: Traction) {
        if self.tailgater.is_none() && self.collision.is_none() {
            if let Some(config) = &self.config.tailgater {
                if self.time >= config.spawn_after {
                    match TailgaterVehicle::spawn(config, self.player.vehicle()) {
                        Ok(tailgater) => self.tailgater = Some(tailgater),
                        Err(e) => warn!("Failed to spawn tailgater: {:#}", e),
                    }
                }
            }
        }
        if let Some(tailgater) = self.tailgater.as_mut() {
            tailgater.tick(dt, self.player.vehicle(), traction);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let distance = self.distance();
        Snapshot {
            time: self.time,
            player_velocity: self.player.velocity(),
            player_position: self.player.position(),
            lead_velocity: self.lead.dynamics().velocity(),
            lead_position: self.lead.dynamics().position(),
            tailgater: self
                .tailgater
                .as_ref()
                .map(|t| (t.dynamics().position(), t.dynamics().velocity())),
            lead_state: self.lead.state().label(),
            speed_limit: self.lead.state().speed_limit,
            distance,
            safe_distance: self.safe_distance,
            safety: SafetyStatus::evaluate(distance, self.safe_distance),
            score: self.game_state.score,
            collision: self.collision.clone(),
        }
    }

    /// Final numbers handed to persistence
    pub fn result(&self) -> SessionResult {
        SessionResult {
            score: self.game_state.rounded_score(),
            distance_km: self.player.position() / 1000.0,
            crash: self.collision.as_ref().map(|c| c.severity),
        }
    }

    fn log_collision(&self, event: &CollisionEvent) {
        warn!(
            "COLLISION ({}) severity={} force={:.1} kN speed diff={:.1} km/h g={:.1}",
            event.crash_type.label(),
            event.severity.label(),
            event.impact_force_kn,
            event.speed_diff_kmh,
            event.g_force
        );
        for damage in &event.vehicles {
            for occupant in &damage.occupants {
                info!(
                    "  {} {}: {} ({:.1} g) - {}",
                    damage.role.label(),
                    occupant.seat.label(),
                    occupant.status.label(),
                    occupant.g_force,
                    occupant.injuries.join(", ")
                );
            }
        }
    }

    /// One-line HUD style status
    pub fn print_status(&self) {
        let snapshot = self.snapshot();
        println!(
            "t={:>6.1}s player={:>5.1} km/h lead={:>5.1} km/h [{}] gap={:>6.1} m safe={:>5.1} m {} score={:.0}",
            snapshot.time,
            ms_to_kmh(snapshot.player_velocity),
            ms_to_kmh(snapshot.lead_velocity),
            snapshot.lead_state,
            snapshot.distance,
            snapshot.safe_distance,
            snapshot.safety.label(),
            snapshot.score
        );
    }

    /// Log the end-of-session statistics
    pub fn log_summary(&self) {
        let result = self.result();
        info!("=== SESSION COMPLETE ===");
        info!("Elapsed time: {:.2}s", self.time);
        info!("Ticks: {}", self.tick_count);
        info!("Final score: {}", result.score);
        info!("Distance driven: {:.3} km", result.distance_km);
        info!("Unsafe time: {:.1}%", self.game_state.unsafe_percentage());
        info!(
            "Crash: {}",
            result.crash.map_or("none", |severity| severity.label())
        );
    }
}
