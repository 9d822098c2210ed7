use crate::dynamics::state::PhysicalState;
use crate::gnc::Stage;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    StageTransition { from: Stage, to: Stage },
    FuelExhausted,
    Touchdown,
    Timeout,
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: PhysicalState,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive true states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &PhysicalState, current: &PhysicalState) -> Option<EventKind>;
}

/// Detects the tick on which the vehicle crosses the surface.
pub struct TouchdownDetector {
    body_radius: f64,
}

impl TouchdownDetector {
    pub fn new(body_radius: f64) -> Self {
        Self { body_radius }
    }
}

impl EventDetector for TouchdownDetector {
    fn check(&mut self, prev: &PhysicalState, current: &PhysicalState) -> Option<EventKind> {
        if prev.altitude(self.body_radius) >= 0.0 && current.altitude(self.body_radius) < 0.0 {
            Some(EventKind::Touchdown)
        } else {
            None
        }
    }
}

/// Detects the tick on which mass first reaches dry mass.
pub struct FuelExhaustionDetector {
    dry_mass: f64,
    fired: bool,
}

impl FuelExhaustionDetector {
    pub fn new(dry_mass: f64) -> Self {
        Self { dry_mass, fired: false }
    }
}

impl EventDetector for FuelExhaustionDetector {
    fn check(&mut self, prev: &PhysicalState, current: &PhysicalState) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if prev.mass > self.dry_mass && current.mass <= self.dry_mass {
            self.fired = true;
            Some(EventKind::FuelExhausted)
        } else {
            None
        }
    }
}
