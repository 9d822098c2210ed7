use crate::config::Config;
use crate::dynamics::gravity::{centrifugal_accel, coriolis_accel, gravity_accel};
use crate::dynamics::state::{ActuatorCommand, Deriv, PhysicalState};

// ---------------------------------------------------------------------------
// Planar equations of motion in polar coordinates
// ---------------------------------------------------------------------------

/// Compute state derivatives under the applied thrust and pitch.
///
/// Forces modeled:
///   1. Gravity: inverse-square, radial
///   2. Thrust: applied magnitude at pitch angle from local vertical
///
/// Rotating-frame terms (centrifugal, Coriolis) fall out of the polar form.
/// Once mass reaches dry mass the engine is cut: no thrust, no mass flow.
pub fn derivatives(state: &PhysicalState, config: &Config, cmd: &ActuatorCommand) -> Deriv {
    let thrust = effective_thrust(state, config, cmd);
    let accel = thrust / state.mass;
    let (sin_a, cos_a) = cmd.pitch.sin_cos();

    Deriv {
        dr: state.dr,
        ddr: accel * cos_a - gravity_accel(config.mu, state.r)
            + centrifugal_accel(state.r, state.dtheta),
        dtheta: state.dtheta,
        ddtheta: (accel * sin_a - coriolis_accel(state.dr, state.dtheta)) / state.r,
        dmass: -config.mass_flow(thrust),
    }
}

/// Applied thrust after the fuel guardrail.
pub fn effective_thrust(state: &PhysicalState, config: &Config, cmd: &ActuatorCommand) -> f64 {
    if state.mass <= config.dry_mass {
        0.0
    } else {
        cmd.thrust
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
