use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// True vehicle state in polar coordinates about the body center
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalState {
    pub r: f64,      // m, distance from body center
    pub dr: f64,     // m/s, radial velocity
    pub theta: f64,  // rad, central angle travelled
    pub dtheta: f64, // rad/s
    pub mass: f64,   // kg
}

impl PhysicalState {
    /// Advance state by a derivative scaled by dt (used inside RK4).
    pub fn apply(&self, d: &Deriv, dt: f64) -> PhysicalState {
        PhysicalState {
            r: self.r + d.dr * dt,
            dr: self.dr + d.ddr * dt,
            theta: self.theta + d.dtheta * dt,
            dtheta: self.dtheta + d.ddtheta * dt,
            mass: self.mass + d.dmass * dt,
        }
    }

    pub fn altitude(&self, body_radius: f64) -> f64 {
        self.r - body_radius
    }

    /// Tangential speed over the surface.
    pub fn horizontal_velocity(&self) -> f64 {
        self.r * self.dtheta
    }

    /// Project onto the local vertical / local horizontal frame.
    pub fn to_local(&self, body_radius: f64) -> LocalFrameState {
        LocalFrameState {
            altitude: self.altitude(body_radius),
            vertical_velocity: self.dr,
            downrange: self.r * self.theta,
            horizontal_velocity: self.horizontal_velocity(),
            mass: self.mass,
        }
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deriv {
    pub dr: f64,
    pub ddr: f64,
    pub dtheta: f64,
    pub ddtheta: f64,
    pub dmass: f64, // negative while burning
}

// ---------------------------------------------------------------------------
// Local frame (altitude / downrange) state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrameState {
    pub altitude: f64,            // m, +up
    pub vertical_velocity: f64,   // m/s
    pub downrange: f64,           // m, arc length
    pub horizontal_velocity: f64, // m/s
    pub mass: f64,                // kg
}

impl LocalFrameState {
    /// Radius from the body center implied by the altitude.
    pub fn radius(&self, body_radius: f64) -> f64 {
        body_radius + self.altitude
    }

    /// Angular rate implied by the horizontal velocity at the current radius.
    pub fn angular_rate(&self, body_radius: f64) -> f64 {
        self.horizontal_velocity / self.radius(body_radius)
    }
}

// ---------------------------------------------------------------------------
// Actuator command (thrust magnitude + pitch from local vertical)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    pub thrust_cmd: f64, // N, before limiting
    pub pitch_cmd: f64,  // rad, before limiting (positive = thrust downrange)
    pub thrust: f64,     // N, applied
    pub pitch: f64,      // rad, applied
}

impl ActuatorCommand {
    /// A command that has already been applied, e.g. the initial engine state.
    pub fn steady(thrust: f64, pitch: f64) -> Self {
        Self {
            thrust_cmd: thrust,
            pitch_cmd: pitch,
            thrust,
            pitch,
        }
    }

    pub fn thrust_saturated(&self) -> bool {
        self.thrust != self.thrust_cmd
    }

    pub fn slew_limited(&self) -> bool {
        self.pitch != self.pitch_cmd
    }
}
