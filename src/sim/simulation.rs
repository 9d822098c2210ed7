use log::warn;

use crate::config::Config;
use crate::dynamics::polar::effective_thrust;
use crate::dynamics::state::{ActuatorCommand, PhysicalState};
use crate::error::{check_timestep, GncError};
use super::integrator::rk4_step;

// ---------------------------------------------------------------------------
// Dynamics component: sole owner of the true vehicle state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Simulation {
    config: Config,
    state: PhysicalState,
    fuel_warned: bool,
}

impl Simulation {
    pub fn new(config: &Config) -> Self {
        Self {
            config: *config,
            state: config.initial_state,
            fuel_warned: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &PhysicalState {
        &self.state
    }

    pub fn altitude(&self) -> f64 {
        self.state.altitude(self.config.body_radius)
    }

    pub fn has_landed(&self) -> bool {
        self.altitude() < 0.0
    }

    pub fn fuel_exhausted(&self) -> bool {
        self.state.mass <= self.config.dry_mass
    }

    /// Thrust the engine actually delivers for this command right now.
    pub fn delivered_thrust(&self, cmd: &ActuatorCommand) -> f64 {
        effective_thrust(&self.state, &self.config, cmd)
    }

    /// Integrate one tick with the command held constant.
    pub fn step(&mut self, cmd: &ActuatorCommand, dt: f64) -> Result<&PhysicalState, GncError> {
        check_timestep(dt)?;
        self.state = rk4_step(&self.state, &self.config, cmd, dt);
        if self.fuel_exhausted() && !self.fuel_warned {
            warn!(
                "propellant exhausted at altitude {:.1} m, engine cut",
                self.altitude()
            );
            self.fuel_warned = true;
        }
        Ok(&self.state)
    }
}
