//! One-shot collision detection and resolution
//!
//! Contact between two cars is resolved as a 1-D partially inelastic
//! collision. The resolver latches after the first impact: the session is
//! over and every later check is a no-op.

use super::injury::{assess_occupants, ImpactSide, OccupantInjury};
use super::types::{ms_to_kmh, VehicleRole, GRAVITY};
use super::vehicle::{Vehicle, VehicleDynamicsModel};

/// Gap between two cars below which they touch, in m
pub const COLLISION_DISTANCE: f32 = 4.0;

/// Minimum closing speed for contact to count as an impact, in m/s
pub const CLOSING_SPEED_THRESHOLD: f32 = 0.1;

/// Coefficient of restitution between two cars
pub const RESTITUTION: f32 = 0.2;

/// Time over which the velocity change of an impact is spread, in s
pub const IMPACT_DURATION: f32 = 0.1;

/// Which end of the player's car was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrashType {
    /// The player ran into the lead car
    Front,
    /// The tailgater ran into the player
    Rear,
    /// Both at once
    Sandwich,
}

impl CrashType {
    pub fn label(self) -> &'static str {
        match self {
            CrashType::Front => "FRONT",
            CrashType::Rear => "REAR",
            CrashType::Sandwich => "SANDWICH",
        }
    }
}

/// Overall severity of a crash
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Minor,
    Moderate,
    Major,
    Severe,
    Catastrophic,
}

/// (tier, force threshold in kN, speed difference threshold in km/h),
/// checked from the top down
const SEVERITY_TIERS: [(Severity, f32, f32); 4] = [
    (Severity::Catastrophic, 150.0, 60.0),
    (Severity::Severe, 100.0, 40.0),
    (Severity::Major, 50.0, 20.0),
    (Severity::Moderate, 20.0, 10.0),
];

impl Severity {
    /// Highest tier whose force or speed threshold is exceeded
    pub fn classify(impact_force_kn: f32, speed_diff_kmh: f32) -> Self {
        SEVERITY_TIERS
            .iter()
            .find(|(_, force, speed)| impact_force_kn > *force || speed_diff_kmh > *speed)
            .map(|(severity, _, _)| *severity)
            .unwrap_or(Severity::Minor)
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Minor => "MINOR",
            Severity::Moderate => "MODERATE",
            Severity::Major => "MAJOR",
            Severity::Severe => "SEVERE",
            Severity::Catastrophic => "CATASTROPHIC",
        }
    }
}

/// Result of resolving one follower/leader pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairImpact {
    pub follower_velocity: f32,
    pub leader_velocity: f32,
    /// Post-impact minus pre-impact velocity of the follower
    pub follower_delta_v: f32,
    /// Post-impact minus pre-impact velocity of the leader
    pub leader_delta_v: f32,
    /// Follower velocity minus leader velocity before impact
    pub closing_speed: f32,
    pub impact_force_kn: f32,
}

/// Resolve a 1-D collision between a follower (1) and a leader (2)
pub fn resolve_pair(m1: f32, v1: f32, m2: f32, v2: f32) -> PairImpact {
    let e = RESTITUTION;
    let total = m1 + m2;
    let v1_after = ((m1 - e * m2) * v1 + m2 * (1.0 + e) * v2) / total;
    let v2_after = ((m2 - e * m1) * v2 + m1 * (1.0 + e) * v1) / total;
    let follower_delta_v = v1_after - v1;

    PairImpact {
        follower_velocity: v1_after,
        leader_velocity: v2_after,
        follower_delta_v,
        leader_delta_v: v2_after - v2,
        closing_speed: v1 - v2,
        impact_force_kn: impact_force_kn(m1, follower_delta_v),
    }
}

/// Average impact force in kN for a velocity change spread over the impact
pub fn impact_force_kn(mass: f32, delta_v: f32) -> f32 {
    mass * delta_v.abs() / IMPACT_DURATION / 1000.0
}

/// Average deceleration in multiples of g
pub fn g_force(delta_v: f32) -> f32 {
    (delta_v.abs() / IMPACT_DURATION) / GRAVITY
}

/// Whether `follower` has run into `leader` this tick
pub fn is_contact(follower: &Vehicle, leader: &Vehicle) -> bool {
    let gap = leader.position() - follower.position();
    let closing_speed = follower.velocity() - leader.velocity();
    gap < COLLISION_DISTANCE && closing_speed > CLOSING_SPEED_THRESHOLD
}

/// What a crash did to one vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDamage {
    pub role: VehicleRole,
    pub velocity_before: f32,
    pub velocity_after: f32,
    /// Magnitude of the velocity change this vehicle went through
    pub delta_v: f32,
    pub g_force: f32,
    pub side: ImpactSide,
    pub occupants: Vec<OccupantInjury>,
}

impl VehicleDamage {
    fn new(vehicle: &Vehicle, velocity_after: f32, delta_v: f32, side: ImpactSide) -> Self {
        let g = g_force(delta_v);
        Self {
            role: vehicle.role(),
            velocity_before: vehicle.velocity(),
            velocity_after,
            delta_v: delta_v.abs(),
            g_force: g,
            side,
            occupants: assess_occupants(vehicle.occupants(), g, side),
        }
    }
}

/// Record of the one crash that ends a session
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    pub impact_force_kn: f32,
    pub speed_diff_kmh: f32,
    pub crash_type: CrashType,
    /// G-force derived from the combined velocity change of the striking cars
    pub g_force: f32,
    pub severity: Severity,
    pub vehicles: Vec<VehicleDamage>,
}

impl CollisionEvent {
    pub fn damage(&self, role: VehicleRole) -> Option<&VehicleDamage> {
        self.vehicles.iter().find(|d| d.role == role)
    }
}

/// Detects the first contact of a session and resolves it
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    fired: bool,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Check for contact and, on the first one, overwrite velocities
    ///
    /// The player may be hit from the front (by running into the lead), from
    /// behind (by the tailgater) or both in the same tick.
    pub fn check(
        &mut self,
        player: &mut VehicleDynamicsModel,
        lead: &mut VehicleDynamicsModel,
        tailgater: Option<&mut VehicleDynamicsModel>,
    ) -> Option<CollisionEvent> {
        if self.fired {
            return None;
        }

        let front = is_contact(player.vehicle(), lead.vehicle());
        let rear = tailgater
            .as_ref()
            .is_some_and(|t| is_contact(t.vehicle(), player.vehicle()));

        let event = match (front, rear, tailgater) {
            (true, true, Some(tailgater)) => resolve_sandwich(tailgater, player, lead),
            (true, _, _) => resolve_single(player, lead, CrashType::Front),
            (false, true, Some(tailgater)) => resolve_single(tailgater, player, CrashType::Rear),
            _ => return None,
        };

        self.fired = true;
        Some(event)
    }
}

fn resolve_single(
    follower: &mut VehicleDynamicsModel,
    leader: &mut VehicleDynamicsModel,
    crash_type: CrashType,
) -> CollisionEvent {
    let impact = resolve_pair(
        follower.vehicle().mass(),
        follower.velocity(),
        leader.vehicle().mass(),
        leader.velocity(),
    );

    let vehicles = vec![
        VehicleDamage::new(
            follower.vehicle(),
            impact.follower_velocity,
            impact.follower_delta_v,
            ImpactSide::Front,
        ),
        VehicleDamage::new(
            leader.vehicle(),
            impact.leader_velocity,
            impact.leader_delta_v,
            ImpactSide::Rear,
        ),
    ];

    follower.apply_impact(impact.follower_velocity);
    leader.apply_impact(impact.leader_velocity);

    CollisionEvent {
        impact_force_kn: impact.impact_force_kn,
        speed_diff_kmh: ms_to_kmh(impact.closing_speed),
        crash_type,
        g_force: g_force(impact.follower_delta_v),
        severity: Severity::classify(impact.impact_force_kn, ms_to_kmh(impact.closing_speed)),
        vehicles,
    }
}

/// Tailgater hits the player who is simultaneously touching the lead
///
/// Both pairs are resolved from the pre-impact velocities. Forces and speed
/// differences are summed for the severity; each car's occupants are judged
/// on that car's own velocity change.
fn resolve_sandwich(
    tailgater: &mut VehicleDynamicsModel,
    player: &mut VehicleDynamicsModel,
    lead: &mut VehicleDynamicsModel,
) -> CollisionEvent {
    let rear = resolve_pair(
        tailgater.vehicle().mass(),
        tailgater.velocity(),
        player.vehicle().mass(),
        player.velocity(),
    );
    let front = resolve_pair(
        player.vehicle().mass(),
        player.velocity(),
        lead.vehicle().mass(),
        lead.velocity(),
    );

    let player_velocity = player.velocity() + rear.leader_delta_v + front.follower_delta_v;
    let player_delta_v = rear.leader_delta_v.abs() + front.follower_delta_v.abs();
    let player_side = if rear.leader_delta_v.abs() >= front.follower_delta_v.abs() {
        ImpactSide::Rear
    } else {
        ImpactSide::Front
    };

    let vehicles = vec![
        VehicleDamage::new(
            tailgater.vehicle(),
            rear.follower_velocity,
            rear.follower_delta_v,
            ImpactSide::Front,
        ),
        VehicleDamage::new(player.vehicle(), player_velocity, player_delta_v, player_side),
        VehicleDamage::new(
            lead.vehicle(),
            front.leader_velocity,
            front.leader_delta_v,
            ImpactSide::Rear,
        ),
    ];

    tailgater.apply_impact(rear.follower_velocity);
    player.apply_impact(player_velocity);
    lead.apply_impact(front.leader_velocity);

    let impact_force_kn = rear.impact_force_kn + front.impact_force_kn;
    let speed_diff_kmh = ms_to_kmh(rear.closing_speed + front.closing_speed);
    let combined_delta_v = rear.follower_delta_v.abs() + front.follower_delta_v.abs();

    CollisionEvent {
        impact_force_kn,
        speed_diff_kmh,
        crash_type: CrashType::Sandwich,
        g_force: g_force(combined_delta_v),
        severity: Severity::classify(impact_force_kn, speed_diff_kmh),
        vehicles,
    }
}
