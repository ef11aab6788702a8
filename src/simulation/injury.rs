//! Occupant injury classification
//!
//! Injuries are a step function of the G-force an occupant experiences.
//! Rear impacts throw the head back and are dominated by whiplash; frontal
//! impacts load the chest against the belt, airbag and steering wheel.

/// Seat an occupant sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    Driver,
    FrontPassenger,
    Rear,
}

impl Seat {
    /// Fraction of the vehicle's G-force reaching this seat
    pub fn g_factor(self) -> f32 {
        match self {
            Seat::Driver | Seat::FrontPassenger => 1.0,
            Seat::Rear => REAR_SEAT_G_FACTOR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Seat::Driver => "driver",
            Seat::FrontPassenger => "front passenger",
            Seat::Rear => "rear passenger",
        }
    }
}

/// Rear-seat occupants are shielded by the front seats
pub const REAR_SEAT_G_FACTOR: f32 = 0.85;

/// Lower G bounds of injury bands 1 through 7; band 0 is everything below 5 g
pub const INJURY_G_THRESHOLDS: [f32; 7] = [5.0, 10.0, 18.0, 30.0, 50.0, 70.0, 100.0];

/// Which way the occupant was thrown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpactSide {
    /// Struck from behind
    Rear,
    /// Struck something ahead
    Front,
}

/// Medical status of an occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InjuryStatus {
    Stable,
    Moderate,
    Serious,
    Critical,
    CriticalUnresponsive,
    Fatal,
}

impl InjuryStatus {
    pub fn label(self) -> &'static str {
        match self {
            InjuryStatus::Stable => "STABLE",
            InjuryStatus::Moderate => "MODERATE",
            InjuryStatus::Serious => "SERIOUS",
            InjuryStatus::Critical => "CRITICAL",
            InjuryStatus::CriticalUnresponsive => "CRITICAL - UNRESPONSIVE",
            InjuryStatus::Fatal => "FATAL",
        }
    }
}

struct InjuryBand {
    status: InjuryStatus,
    rear: &'static [&'static str],
    front: &'static [&'static str],
}

const INJURY_BANDS: [InjuryBand; 8] = [
    InjuryBand {
        status: InjuryStatus::Stable,
        rear: &["No visible injuries", "Mild neck stiffness"],
        front: &["No visible injuries", "Minor airbag abrasion"],
    },
    InjuryBand {
        status: InjuryStatus::Stable,
        rear: &["Mild whiplash", "Seatbelt bruising"],
        front: &["Airbag burns to forearms", "Seatbelt chest bruising"],
    },
    InjuryBand {
        status: InjuryStatus::Moderate,
        rear: &["Whiplash (grade II)", "Lower back strain", "Headache"],
        front: &["Sternum contusion", "Wrist fracture", "Facial lacerations"],
    },
    InjuryBand {
        status: InjuryStatus::Serious,
        rear: &["Whiplash (grade III)", "Cervical sprain", "Concussion"],
        front: &["Rib fractures", "Knee fractures from dashboard", "Concussion"],
    },
    InjuryBand {
        status: InjuryStatus::Critical,
        rear: &[
            "Cervical vertebra fracture",
            "Thoracic spine injury",
            "Traumatic brain injury",
        ],
        front: &[
            "Steering wheel chest trauma",
            "Pneumothorax",
            "Femur fracture",
        ],
    },
    InjuryBand {
        status: InjuryStatus::CriticalUnresponsive,
        rear: &[
            "Cervical spinal cord injury",
            "Severe traumatic brain injury",
            "Loss of consciousness",
        ],
        front: &[
            "Flail chest",
            "Severe head trauma from steering wheel",
            "Loss of consciousness",
        ],
    },
    InjuryBand {
        status: InjuryStatus::Fatal,
        rear: &["Atlanto-occipital dislocation", "Massive internal bleeding"],
        front: &["Aortic rupture", "Massive internal bleeding"],
    },
    InjuryBand {
        status: InjuryStatus::Fatal,
        rear: &["Non-survivable head and spinal trauma"],
        front: &["Non-survivable blunt force trauma"],
    },
];

/// Index of the injury band a G-force falls into, 0 through 7
pub fn injury_band(g_force: f32) -> usize {
    INJURY_G_THRESHOLDS
        .iter()
        .take_while(|&&threshold| g_force >= threshold)
        .count()
}

/// Status and injury descriptors for a single occupant
pub fn classify_injuries(
    g_force: f32,
    side: ImpactSide,
) -> (InjuryStatus, &'static [&'static str]) {
    let band = &INJURY_BANDS[injury_band(g_force)];
    let injuries = match side {
        ImpactSide::Rear => band.rear,
        ImpactSide::Front => band.front,
    };
    (band.status, injuries)
}

/// Injury report for one occupant
#[derive(Debug, Clone, PartialEq)]
pub struct OccupantInjury {
    pub seat: Seat,
    /// G-force at this seat
    pub g_force: f32,
    pub status: InjuryStatus,
    pub injuries: &'static [&'static str],
}

/// Evaluate every occupant of a vehicle against the vehicle's G-force
pub fn assess_occupants(seats: &[Seat], g_force: f32, side: ImpactSide) -> Vec<OccupantInjury> {
    seats
        .iter()
        .map(|&seat| {
            let seat_g = g_force * seat.g_factor();
            let (status, injuries) = classify_injuries(seat_g, side);
            OccupantInjury {
                seat,
                g_force: seat_g,
                status,
                injuries,
            }
        })
        .collect()
}
