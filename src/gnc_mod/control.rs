use log::trace;
use nalgebra::Vector2;

use crate::config::Config;
use crate::dynamics::gravity::{centrifugal_accel, coriolis_accel, gravity_accel};
use crate::dynamics::state::{ActuatorCommand, LocalFrameState};
use super::guidance::GuidanceTarget;

// ---------------------------------------------------------------------------
// Actuator limits
// ---------------------------------------------------------------------------

/// Hard saturation into [0, max_thrust]; direction is not rescaled.
pub fn limit_thrust(thrust_cmd: f64, max_thrust: f64) -> f64 {
    thrust_cmd.clamp(0.0, max_thrust)
}

/// Move from `previous` toward `pitch_cmd` by at most max_rate * dt.
pub fn limit_slew(pitch_cmd: f64, previous: f64, max_rate: f64, dt: f64) -> f64 {
    let max_step = max_rate * dt;
    previous + (pitch_cmd - previous).clamp(-max_step, max_step)
}

// ---------------------------------------------------------------------------
// Descent controller: rotating-frame command law + actuator limits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DescentController {
    mu: f64,
    body_radius: f64,
    max_thrust: f64,
    max_slew_rate: f64,
    initial: ActuatorCommand,
    command: ActuatorCommand,
}

impl DescentController {
    pub fn new(config: &Config) -> Self {
        Self {
            mu: config.mu,
            body_radius: config.body_radius,
            max_thrust: config.max_thrust,
            max_slew_rate: config.max_slew_rate,
            initial: config.initial_command,
            command: config.initial_command,
        }
    }

    /// Last command produced (or the initial command before the first tick).
    pub fn command(&self) -> &ActuatorCommand {
        &self.command
    }

    /// Specific force needed in the local frame, (vertical, horizontal).
    ///
    /// Adds back gravity less centrifugal relief on the vertical axis and the
    /// Coriolis coupling on the horizontal axis.
    pub fn specific_force(&self, nav: &LocalFrameState, target: &GuidanceTarget) -> Vector2<f64> {
        let r = nav.radius(self.body_radius);
        let dtheta = nav.angular_rate(self.body_radius);
        Vector2::new(
            target.accel_vertical + gravity_accel(self.mu, r) - centrifugal_accel(r, dtheta),
            target.accel_horizontal + coriolis_accel(nav.vertical_velocity, dtheta),
        )
    }

    /// Unlimited (thrust, pitch) command.
    pub fn command_law(&self, nav: &LocalFrameState, target: &GuidanceTarget) -> (f64, f64) {
        let f = self.specific_force(nav, target);
        (nav.mass * f.norm(), f.y.atan2(f.x))
    }

    pub fn update(
        &mut self,
        dt: f64,
        nav: &LocalFrameState,
        target: &GuidanceTarget,
    ) -> ActuatorCommand {
        let (thrust_cmd, pitch_cmd) = self.command_law(nav, target);
        let cmd = ActuatorCommand {
            thrust_cmd,
            pitch_cmd,
            thrust: limit_thrust(thrust_cmd, self.max_thrust),
            pitch: limit_slew(pitch_cmd, self.command.pitch, self.max_slew_rate, dt),
        };
        if cmd.thrust_saturated() || cmd.slew_limited() {
            trace!(
                "actuator limited: thrust {:.0}/{:.0} N, pitch {:.2}/{:.2} deg",
                cmd.thrust,
                cmd.thrust_cmd,
                cmd.pitch.to_degrees(),
                cmd.pitch_cmd.to_degrees()
            );
        }
        self.command = cmd;
        cmd
    }
}

impl super::Controller for DescentController {
    fn control(
        &mut self,
        dt: f64,
        nav: &LocalFrameState,
        target: &GuidanceTarget,
    ) -> ActuatorCommand {
        self.update(dt, nav, target)
    }

    fn reset(&mut self) {
        self.command = self.initial;
    }

    fn name(&self) -> &str {
        "DescentController"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::presets;
    use crate::gnc_mod::guidance::Stage;
    use crate::gnc_mod::Controller;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn target(accel_vertical: f64, accel_horizontal: f64) -> GuidanceTarget {
        GuidanceTarget {
            altitude: 0.0,
            vertical_velocity: 0.0,
            downrange: 0.0,
            horizontal_velocity: 0.0,
            accel_vertical,
            accel_horizontal,
            stage: Stage::Braking,
            elapsed: 0.0,
            stage_duration: 100.0,
        }
    }

    fn hover_nav(cfg: &Config) -> LocalFrameState {
        LocalFrameState {
            altitude: 100.0,
            vertical_velocity: 0.0,
            downrange: 0.0,
            horizontal_velocity: 0.0,
            mass: cfg.dry_mass + 2_000.0,
        }
    }

    #[test]
    fn hover_thrust_is_weight_and_vertical() {
        let cfg = presets::apollo_lm();
        let ctrl = DescentController::new(&cfg);
        let nav = hover_nav(&cfg);
        let (thrust, pitch) = ctrl.command_law(&nav, &target(0.0, 0.0));
        let r = nav.radius(cfg.body_radius);
        assert_relative_eq!(thrust, nav.mass * cfg.gravity(r), max_relative = 1e-12);
        assert_relative_eq!(pitch, 0.0);
    }

    #[test]
    fn braking_points_thrust_retrograde() {
        let cfg = presets::apollo_lm();
        let ctrl = DescentController::new(&cfg);
        let nav = hover_nav(&cfg);
        let (_, pitch) = ctrl.command_law(&nav, &target(0.0, -2.0));
        assert!(pitch < 0.0 && pitch > -FRAC_PI_2);
    }

    #[test]
    fn orbital_speed_relieves_gravity() {
        let cfg = presets::apollo_lm();
        let ctrl = DescentController::new(&cfg);
        let local = cfg.initial_state.to_local(cfg.body_radius);
        let f = ctrl.specific_force(&local, &target(0.0, 0.0));
        // 1,695 m/s is slightly above circular speed at 15 km
        assert!(f.x < 0.0, "vertical specific force {}", f.x);
    }

    #[test]
    fn coriolis_couples_descent_rate() {
        let cfg = presets::apollo_lm();
        let ctrl = DescentController::new(&cfg);
        let mut nav = hover_nav(&cfg);
        nav.vertical_velocity = -20.0;
        nav.horizontal_velocity = 500.0;
        let f = ctrl.specific_force(&nav, &target(0.0, 0.0));
        let r = nav.radius(cfg.body_radius);
        assert_relative_eq!(f.y, 2.0 * -20.0 * 500.0 / r, max_relative = 1e-12);
    }

    #[test]
    fn thrust_limiter_saturates_exactly() {
        let cfg = presets::apollo_lm();
        assert_eq!(limit_thrust(10.0 * cfg.max_thrust, cfg.max_thrust), cfg.max_thrust);
        assert_eq!(limit_thrust(-5.0, cfg.max_thrust), 0.0);
        assert_eq!(limit_thrust(1_000.0, cfg.max_thrust), 1_000.0);
    }

    #[test]
    fn slew_limiter_bounds_pitch_change() {
        let rate = 6.0_f64.to_radians();
        let dt = 0.1;
        let p = limit_slew(1.0, 0.0, rate, dt);
        assert_relative_eq!(p, rate * dt);
        let p = limit_slew(-1.0, 0.0, rate, dt);
        assert_relative_eq!(p, -rate * dt);
        let p = limit_slew(0.001, 0.0, rate, dt);
        assert_relative_eq!(p, 0.001);
    }

    #[test]
    fn applied_command_respects_limits_every_tick() {
        let cfg = presets::apollo_lm();
        let mut ctrl = DescentController::new(&cfg);
        let nav = hover_nav(&cfg);
        let dt = 0.1;
        let mut prev = cfg.initial_command.pitch;
        for i in 0..200 {
            // Alternate between extreme demands
            let sign = if i % 40 < 20 { 1.0 } else { -1.0 };
            let cmd = ctrl.control(dt, &nav, &target(50.0, sign * 80.0));
            assert!(cmd.thrust >= 0.0 && cmd.thrust <= cfg.max_thrust);
            assert!((cmd.pitch - prev).abs() <= cfg.max_slew_rate * dt + 1e-12);
            prev = cmd.pitch;
        }
    }

    #[test]
    fn excess_demand_reports_saturation() {
        let cfg = presets::apollo_lm();
        let mut ctrl = DescentController::new(&cfg);
        let cmd = ctrl.control(0.1, &hover_nav(&cfg), &target(100.0, 0.0));
        assert!(cmd.thrust_saturated());
        assert_eq!(cmd.thrust, cfg.max_thrust);
        // Initial pitch is -90 deg, commanded is vertical: slew limited
        assert!(cmd.slew_limited());
    }

    #[test]
    fn reset_restores_initial_pitch() {
        let cfg = presets::apollo_lm();
        let mut ctrl = DescentController::new(&cfg);
        ctrl.control(0.1, &hover_nav(&cfg), &target(0.0, 0.0));
        assert_ne!(ctrl.command().pitch, cfg.initial_command.pitch);
        ctrl.reset();
        assert_eq!(ctrl.command().pitch, cfg.initial_command.pitch);
    }
}
