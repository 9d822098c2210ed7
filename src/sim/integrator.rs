use crate::config::Config;
use crate::dynamics;
use crate::dynamics::state::{ActuatorCommand, PhysicalState};

// ---------------------------------------------------------------------------
// Classical 4th-order Runge-Kutta with the actuator command held over the step
// ---------------------------------------------------------------------------

/// Single RK4 step: advance the true state by dt.
///
/// Mass is clamped at dry mass; an intermediate stage may dip below it and
/// cut the engine, the returned state never does.
pub fn rk4_step(
    state: &PhysicalState,
    config: &Config,
    cmd: &ActuatorCommand,
    dt: f64,
) -> PhysicalState {
    let k1 = dynamics::derivatives(state, config, cmd);
    let k2 = dynamics::derivatives(&state.apply(&k1, dt * 0.5), config, cmd);
    let k3 = dynamics::derivatives(&state.apply(&k2, dt * 0.5), config, cmd);
    let k4 = dynamics::derivatives(&state.apply(&k3, dt), config, cmd);

    PhysicalState {
        r: state.r + (k1.dr + 2.0 * k2.dr + 2.0 * k3.dr + k4.dr) * (dt / 6.0),
        dr: state.dr + (k1.ddr + 2.0 * k2.ddr + 2.0 * k3.ddr + k4.ddr) * (dt / 6.0),
        theta: state.theta
            + (k1.dtheta + 2.0 * k2.dtheta + 2.0 * k3.dtheta + k4.dtheta) * (dt / 6.0),
        dtheta: state.dtheta
            + (k1.ddtheta + 2.0 * k2.ddtheta + 2.0 * k3.ddtheta + k4.ddtheta) * (dt / 6.0),
        mass: (state.mass + (k1.dmass + 2.0 * k2.dmass + 2.0 * k3.dmass + k4.dmass) * (dt / 6.0))
            .max(config.dry_mass)
            .min(state.mass),
    }
}
