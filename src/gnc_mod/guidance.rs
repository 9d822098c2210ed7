use log::info;
use serde::{Deserialize, Serialize};

use crate::dynamics::state::LocalFrameState;
use crate::error::{check_timestep, GncError};
use super::poly::CubicPolynomial;

// ---------------------------------------------------------------------------
// Descent stages (irreversible: braking -> approach -> final)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Braking = 1,
    Approach = 2,
    Final = 3,
}

impl Stage {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Braking => "braking",
            Stage::Approach => "approach",
            Stage::Final => "final",
        }
    }
}

/// Target state at the end of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub altitude: f64,          // m
    pub vertical_velocity: f64, // m/s
    pub downrange: f64,         // m
    pub duration: f64,          // s, time budget for reaching it
}

/// Staging plan: waypoints, exit thresholds and time budgets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidancePlan {
    pub braking: Waypoint,
    pub approach: Waypoint,
    pub final_duration: f64,        // s
    pub approach_altitude: f64,     // m, braking -> approach
    pub final_altitude: f64,        // m, approach -> final
    /// Also enter the final stage once horizontal speed drops below this.
    pub final_horizontal_speed: Option<f64>,
}

impl Default for GuidancePlan {
    fn default() -> Self {
        Self {
            braking: Waypoint {
                altitude: 0.0,
                vertical_velocity: -50.0,
                downrange: 480_000.0,
                duration: 660.0,
            },
            approach: Waypoint {
                altitude: 0.0,
                vertical_velocity: 0.0,
                downrange: 480_000.0,
                duration: 160.0,
            },
            final_duration: 120.0,
            approach_altitude: 2_500.0,
            final_altitude: 150.0,
            final_horizontal_speed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Guidance output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidanceTarget {
    pub altitude: f64,
    pub vertical_velocity: f64,
    pub downrange: f64,
    pub horizontal_velocity: f64,
    pub accel_vertical: f64,   // m/s^2, commanded
    pub accel_horizontal: f64, // m/s^2, commanded
    pub stage: Stage,
    pub elapsed: f64,        // s in current stage
    pub stage_duration: f64, // s budgeted for current stage
}

// ---------------------------------------------------------------------------
// Staged receding-horizon guidance
// ---------------------------------------------------------------------------

/// Replans a cubic to the current waypoint every tick and commands its
/// initial acceleration.
#[derive(Debug, Clone)]
pub struct Guidance {
    plan: GuidancePlan,
    target: GuidanceTarget,
    downrange_hold: Option<f64>,
}

impl Guidance {
    pub fn new(plan: GuidancePlan) -> Self {
        let wp = plan.braking;
        Self {
            plan,
            target: GuidanceTarget {
                altitude: wp.altitude,
                vertical_velocity: wp.vertical_velocity,
                downrange: wp.downrange,
                horizontal_velocity: 0.0,
                accel_vertical: 0.0,
                accel_horizontal: 0.0,
                stage: Stage::Braking,
                elapsed: 0.0,
                stage_duration: wp.duration,
            },
            downrange_hold: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.target.stage
    }

    pub fn target(&self) -> &GuidanceTarget {
        &self.target
    }

    /// Downrange captured on entering the final stage.
    pub fn downrange_hold(&self) -> Option<f64> {
        self.downrange_hold
    }

    pub fn step(&mut self, dt: f64, nav: &LocalFrameState) -> Result<GuidanceTarget, GncError> {
        check_timestep(dt)?;
        self.target.elapsed += dt;
        self.check_stage(nav);
        self.set_waypoint(nav);

        // Floor at dt so the fit never collapses to a zero-length horizon
        let t_go = (self.target.stage_duration - self.target.elapsed).max(dt);
        let vertical = CubicPolynomial::fit(
            t_go,
            nav.altitude,
            self.target.altitude,
            nav.vertical_velocity,
            self.target.vertical_velocity,
        )?;
        let horizontal = CubicPolynomial::fit(
            t_go,
            nav.downrange,
            self.target.downrange,
            nav.horizontal_velocity,
            self.target.horizontal_velocity,
        )?;
        self.target.accel_vertical = vertical.accel(0.0);
        self.target.accel_horizontal = horizontal.accel(0.0);

        Ok(self.target)
    }

    fn check_stage(&mut self, nav: &LocalFrameState) {
        let next = match self.target.stage {
            Stage::Braking if nav.altitude <= self.plan.approach_altitude => Stage::Approach,
            Stage::Approach if self.final_gate(nav) => Stage::Final,
            _ => return,
        };
        info!(
            "{} stage after {:.2} s in {} (altitude {:.1} m)",
            next.name(),
            self.target.elapsed,
            self.target.stage.name(),
            nav.altitude
        );
        if next == Stage::Final {
            self.downrange_hold = Some(nav.downrange);
        }
        self.target.stage = next;
        self.target.elapsed = 0.0;
    }

    fn final_gate(&self, nav: &LocalFrameState) -> bool {
        nav.altitude <= self.plan.final_altitude
            || self
                .plan
                .final_horizontal_speed
                .is_some_and(|v| nav.horizontal_velocity.abs() <= v)
    }

    fn set_waypoint(&mut self, nav: &LocalFrameState) {
        let (altitude, vertical_velocity, downrange, duration) = match self.target.stage {
            Stage::Braking => {
                let wp = self.plan.braking;
                (wp.altitude, wp.vertical_velocity, wp.downrange, wp.duration)
            }
            Stage::Approach => {
                let wp = self.plan.approach;
                (wp.altitude, wp.vertical_velocity, wp.downrange, wp.duration)
            }
            Stage::Final => (
                0.0,
                0.0,
                self.downrange_hold.unwrap_or(nav.downrange),
                self.plan.final_duration,
            ),
        };
        self.target.altitude = altitude;
        self.target.vertical_velocity = vertical_velocity;
        self.target.downrange = downrange;
        self.target.horizontal_velocity = 0.0;
        self.target.stage_duration = duration;
    }
}

impl Default for Guidance {
    fn default() -> Self {
        Self::new(GuidancePlan::default())
    }
}
