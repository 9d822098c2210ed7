use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dynamics::state::{ActuatorCommand, PhysicalState};

// ---------------------------------------------------------------------------
// Configuration errors (checked once, before the loop starts)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max thrust must be positive and finite, got {0} N")]
    NonPositiveThrust(f64),
    #[error("specific impulse must be positive and finite, got {0} s")]
    NonPositiveIsp(f64),
    #[error("dry mass must be positive and finite, got {0} kg")]
    NonPositiveDryMass(f64),
    #[error("dry mass {dry} kg must be below finite wet mass {wet} kg")]
    DryMassNotBelowWet { dry: f64, wet: f64 },
    #[error("initial mass {mass} kg outside [{dry}, {wet}] kg")]
    InitialMassOutOfRange { mass: f64, dry: f64, wet: f64 },
    #[error("gravitational parameter must be positive and finite, got {0} m^3/s^2")]
    NonPositiveGravParam(f64),
    #[error("body radius must be positive and finite, got {0} m")]
    NonPositiveBodyRadius(f64),
    #[error("max slew rate must be positive and finite, got {0} rad/s")]
    NonPositiveSlewRate(f64),
    #[error("standard gravity must be positive and finite, got {0} m/s^2")]
    NonPositiveStandardGravity(f64),
    #[error("initial state and command must be finite")]
    NonFiniteInitialCondition,
    #[error("starting altitude must be above the surface, got {0} m")]
    StartBelowSurface(f64),
    #[error("time step must be positive and finite, got {0} s")]
    NonPositiveTimestep(f64),
    #[error("mission time cap must be positive and finite, got {0} s")]
    NonPositiveTimeCap(f64),
}

// ---------------------------------------------------------------------------
// Vehicle + environment configuration
// ---------------------------------------------------------------------------

/// Physical constants, vehicle limits and initial conditions.
///
/// Built once through [`ConfigBuilder`] (or a preset) and shared read-only
/// with every component constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub mu: f64,               // m^3/s^2
    pub body_radius: f64,      // m
    pub wet_mass: f64,         // kg
    pub dry_mass: f64,         // kg
    pub max_thrust: f64,       // N
    pub isp: f64,              // s
    pub max_slew_rate: f64,    // rad/s
    pub standard_gravity: f64, // m/s^2, for the rocket equation only
    pub initial_state: PhysicalState,
    pub initial_command: ActuatorCommand,
}

impl Config {
    /// Propellant mass flow at a given thrust: mdot = T / (Isp * g0)
    pub fn mass_flow(&self, thrust: f64) -> f64 {
        thrust / (self.isp * self.standard_gravity)
    }

    pub fn propellant_mass(&self) -> f64 {
        self.wet_mass - self.dry_mass
    }

    /// Ideal delta-v from the initial mass down to dry mass.
    pub fn delta_v(&self) -> f64 {
        self.isp * self.standard_gravity * (self.initial_state.mass / self.dry_mass).ln()
    }

    /// Local gravitational acceleration at radius r.
    pub fn gravity(&self, r: f64) -> f64 {
        self.mu / (r * r)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.max_thrust) {
            return Err(ConfigError::NonPositiveThrust(self.max_thrust));
        }
        if !positive(self.isp) {
            return Err(ConfigError::NonPositiveIsp(self.isp));
        }
        if !positive(self.dry_mass) {
            return Err(ConfigError::NonPositiveDryMass(self.dry_mass));
        }
        if !(self.dry_mass < self.wet_mass && self.wet_mass.is_finite()) {
            return Err(ConfigError::DryMassNotBelowWet {
                dry: self.dry_mass,
                wet: self.wet_mass,
            });
        }
        let m = self.initial_state.mass;
        if !(m >= self.dry_mass && m <= self.wet_mass) {
            return Err(ConfigError::InitialMassOutOfRange {
                mass: m,
                dry: self.dry_mass,
                wet: self.wet_mass,
            });
        }
        if !positive(self.mu) {
            return Err(ConfigError::NonPositiveGravParam(self.mu));
        }
        if !positive(self.body_radius) {
            return Err(ConfigError::NonPositiveBodyRadius(self.body_radius));
        }
        if !positive(self.max_slew_rate) {
            return Err(ConfigError::NonPositiveSlewRate(self.max_slew_rate));
        }
        if !positive(self.standard_gravity) {
            return Err(ConfigError::NonPositiveStandardGravity(self.standard_gravity));
        }
        let s = &self.initial_state;
        let c = &self.initial_command;
        if ![s.r, s.dr, s.theta, s.dtheta, c.thrust, c.pitch].iter().all(|v| v.is_finite()) {
            return Err(ConfigError::NonFiniteInitialCondition);
        }
        let alt = s.altitude(self.body_radius);
        if alt <= 0.0 {
            return Err(ConfigError::StartBelowSurface(alt));
        }
        Ok(())
    }
}

/// Strictly positive and finite; rejects NaN.
fn positive(x: f64) -> bool {
    x > 0.0 && x.is_finite()
}

// ---------------------------------------------------------------------------
// Config builder
// ---------------------------------------------------------------------------

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Starts from the Apollo LM descent configuration.
    pub fn new() -> Self {
        Self {
            config: presets::apollo_lm(),
        }
    }

    pub fn mu(mut self, v: f64) -> Self { self.config.mu = v; self }
    pub fn body_radius(mut self, v: f64) -> Self { self.config.body_radius = v; self }
    pub fn wet_mass(mut self, v: f64) -> Self { self.config.wet_mass = v; self }
    pub fn dry_mass(mut self, v: f64) -> Self { self.config.dry_mass = v; self }
    pub fn max_thrust(mut self, v: f64) -> Self { self.config.max_thrust = v; self }
    pub fn isp(mut self, v: f64) -> Self { self.config.isp = v; self }
    pub fn max_slew_rate(mut self, v: f64) -> Self { self.config.max_slew_rate = v; self }
    pub fn standard_gravity(mut self, v: f64) -> Self { self.config.standard_gravity = v; self }
    pub fn initial_state(mut self, v: PhysicalState) -> Self { self.config.initial_state = v; self }
    pub fn initial_command(mut self, v: ActuatorCommand) -> Self { self.config.initial_command = v; self }

    /// Start at rest relative to the local frame at the given altitude.
    pub fn start_altitude(mut self, altitude: f64, horizontal_velocity: f64) -> Self {
        let r = self.config.body_radius + altitude;
        self.config.initial_state = PhysicalState {
            r,
            dr: 0.0,
            theta: 0.0,
            dtheta: horizontal_velocity / r,
            mass: self.config.wet_mass,
        };
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Simulation loop configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub dt: f64,       // s, fixed tick
    pub max_time: f64, // s, mission time cap
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.dt) {
            return Err(ConfigError::NonPositiveTimestep(self.dt));
        }
        if !positive(self.max_time) {
            return Err(ConfigError::NonPositiveTimeCap(self.max_time));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,          // 10 Hz
            max_time: 1000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    pub const MOON_RADIUS: f64 = 1_737_000.0;
    pub const MOON_MU: f64 = 4.9028e12;
    pub const EARTH_G0: f64 = 9.81;

    /// Apollo 11 LM at powered descent initiation (15,240 m, ~1,695 m/s).
    pub fn apollo_lm() -> Config {
        let dry_mass = 7_201.0;
        let wet_mass = dry_mass + 8_134.0;
        let r0 = MOON_RADIUS + 15_240.0;
        let pitch0 = -std::f64::consts::FRAC_PI_2;
        Config {
            mu: MOON_MU,
            body_radius: MOON_RADIUS,
            wet_mass,
            dry_mass,
            max_thrust: 45_000.0,
            isp: 311.0,
            max_slew_rate: 6.0_f64.to_radians(),
            standard_gravity: EARTH_G0,
            initial_state: PhysicalState {
                r: r0,
                dr: 0.0,
                theta: 0.0,
                dtheta: 1_695.043_855 / r0,
                mass: wet_mass,
            },
            initial_command: ActuatorCommand::steady(0.0, pitch0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn apollo_preset_is_valid() {
        let cfg = presets::apollo_lm();
        assert!(cfg.validate().is_ok());
        assert_relative_eq!(cfg.wet_mass, 15_335.0);
        assert_relative_eq!(cfg.initial_state.altitude(cfg.body_radius), 15_240.0, epsilon = 1e-6);
    }

    #[test]
    fn delta_v_is_physical() {
        let cfg = presets::apollo_lm();
        // 311 s * 9.81 * ln(15335 / 7201) ~ 2.3 km/s
        let dv = cfg.delta_v();
        assert!(dv > 2_200.0 && dv < 2_400.0, "delta-v {dv}");
    }

    #[test]
    fn rejects_non_positive_thrust() {
        let err = ConfigBuilder::new().max_thrust(0.0).build().unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveThrust(0.0));
    }

    #[test]
    fn rejects_non_positive_isp() {
        let err = ConfigBuilder::new().isp(-1.0).build().unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveIsp(-1.0));
    }

    #[test]
    fn rejects_dry_mass_at_or_above_wet() {
        let err = ConfigBuilder::new().dry_mass(15_335.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::DryMassNotBelowWet { .. }));
    }

    #[test]
    fn rejects_start_below_surface() {
        let err = ConfigBuilder::new().start_altitude(0.0, 0.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::StartBelowSurface(_)));
    }

    #[test]
    fn sim_config_rejects_zero_dt() {
        let cfg = SimConfig { dt: 0.0, max_time: 10.0 };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveTimestep(0.0)));
        let cfg = SimConfig { dt: -0.1, max_time: 10.0 };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_nan_parameters() {
        let err = ConfigBuilder::new().max_thrust(f64::NAN).build().unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveThrust(v) if v.is_nan()));
        let err = ConfigBuilder::new().isp(f64::NAN).build().unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveIsp(_)));
        let err = ConfigBuilder::new().max_slew_rate(f64::NAN).build().unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveSlewRate(_)));
        let err = ConfigBuilder::new().mu(f64::INFINITY).build().unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveGravParam(_)));
    }

    #[test]
    fn rejects_nan_masses() {
        let err = ConfigBuilder::new().dry_mass(f64::NAN).build().unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveDryMass(_)));
        let err = ConfigBuilder::new().wet_mass(f64::NAN).build().unwrap_err();
        assert!(matches!(err, ConfigError::DryMassNotBelowWet { .. }));
        let mut cfg = presets::apollo_lm();
        cfg.initial_state.mass = f64::NAN;
        assert!(matches!(cfg.validate(), Err(ConfigError::InitialMassOutOfRange { .. })));
    }

    #[test]
    fn rejects_non_finite_initial_condition() {
        let mut cfg = presets::apollo_lm();
        cfg.initial_state.dtheta = f64::NAN;
        assert_eq!(cfg.validate(), Err(ConfigError::NonFiniteInitialCondition));
        let mut cfg = presets::apollo_lm();
        cfg.initial_command.pitch = f64::INFINITY;
        assert_eq!(cfg.validate(), Err(ConfigError::NonFiniteInitialCondition));
    }

    #[test]
    fn sim_config_rejects_non_finite_values() {
        let cfg = SimConfig { dt: f64::NAN, max_time: 10.0 };
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositiveTimestep(_))));
        let cfg = SimConfig { dt: 0.1, max_time: f64::INFINITY };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveTimeCap(f64::INFINITY)));
        let cfg = SimConfig { dt: 0.1, max_time: f64::NAN };
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositiveTimeCap(_))));
    }

    #[test]
    fn start_altitude_sets_wet_mass() {
        let cfg = ConfigBuilder::new().start_altitude(500.0, 0.0).build().unwrap();
        assert_relative_eq!(cfg.initial_state.mass, cfg.wet_mass);
        assert_relative_eq!(cfg.initial_state.dtheta, 0.0);
    }
}
