use serde::Serialize;

use crate::config::Config;
use crate::dynamics::state::{ActuatorCommand, LocalFrameState, PhysicalState};
use crate::error::GncError;
use crate::gnc::{GuidanceTarget, Stage};
use crate::sim::event::EventKind;
use crate::sim::runner::DescentOutcome;

// ---------------------------------------------------------------------------
// Per-tick telemetry record
// ---------------------------------------------------------------------------

/// Flat snapshot of one tick: truth, estimate, actuator and staging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub t: f64,
    // true state
    pub r: f64,
    pub dr: f64,
    pub theta: f64,
    pub dtheta: f64,
    pub mass: f64,
    // local-frame estimate
    pub altitude: f64,
    pub vertical_velocity: f64,
    pub downrange: f64,
    pub horizontal_velocity: f64,
    // actuator; `thrust` is what the engine delivers, zero once dry
    pub thrust_cmd: f64,
    pub thrust: f64,
    pub pitch_cmd: f64,
    pub pitch: f64,
    // guidance
    pub stage: u8,
    pub stage_elapsed: f64,
    pub accel_vertical: f64,
    pub accel_horizontal: f64,
    // guardrails
    pub thrust_saturated: bool,
    pub slew_limited: bool,
    pub fuel_exhausted: bool,
}

impl TelemetryRecord {
    pub fn new(
        t: f64,
        truth: &PhysicalState,
        nav: &LocalFrameState,
        target: &GuidanceTarget,
        cmd: &ActuatorCommand,
        delivered_thrust: f64,
        fuel_exhausted: bool,
    ) -> Self {
        Self {
            t,
            r: truth.r,
            dr: truth.dr,
            theta: truth.theta,
            dtheta: truth.dtheta,
            mass: truth.mass,
            altitude: nav.altitude,
            vertical_velocity: nav.vertical_velocity,
            downrange: nav.downrange,
            horizontal_velocity: nav.horizontal_velocity,
            thrust_cmd: cmd.thrust_cmd,
            thrust: delivered_thrust,
            pitch_cmd: cmd.pitch_cmd,
            pitch: cmd.pitch,
            stage: target.stage.index(),
            stage_elapsed: target.elapsed,
            accel_vertical: target.accel_vertical,
            accel_horizontal: target.accel_horizontal,
            thrust_saturated: cmd.thrust_saturated(),
            slew_limited: cmd.slew_limited(),
            fuel_exhausted,
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Receives one record per tick, in order.
pub trait TelemetrySink {
    fn record(&mut self, record: &TelemetryRecord) -> Result<(), GncError>;
}

/// In-memory append-only recorder.
#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    records: Vec<TelemetryRecord>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_stage(&self) -> u8 {
        self.records.iter().map(|r| r.stage).max().unwrap_or(0)
    }

    pub fn peak_thrust(&self) -> f64 {
        self.records.iter().map(|r| r.thrust).fold(0.0_f64, f64::max)
    }

    /// Fraction of ticks spent at the thrust limit.
    pub fn saturation_ratio(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let n = self.records.iter().filter(|r| r.thrust_saturated).count();
        n as f64 / self.records.len() as f64
    }
}

impl TelemetrySink for Telemetry {
    fn record(&mut self, record: &TelemetryRecord) -> Result<(), GncError> {
        self.records.push(*record);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Descent summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DescentSummary {
    pub landed: bool,
    pub flight_time: f64,
    pub touchdown_vertical_speed: f64,
    pub touchdown_horizontal_speed: f64,
    pub downrange: f64,
    pub propellant_used: f64,
    pub propellant_remaining: f64,
    pub approach_entry: Option<f64>,
    pub final_entry: Option<f64>,
}

impl DescentSummary {
    pub fn new(config: &Config, outcome: &DescentOutcome) -> Self {
        let s = &outcome.final_state;
        let entry = |stage: Stage| {
            outcome.events.iter().find_map(|e| match e.kind {
                EventKind::StageTransition { to, .. } if to == stage => Some(e.time),
                _ => None,
            })
        };
        Self {
            landed: outcome.landed,
            flight_time: outcome.time,
            touchdown_vertical_speed: s.dr,
            touchdown_horizontal_speed: s.horizontal_velocity(),
            downrange: s.r * s.theta,
            propellant_used: config.initial_state.mass - s.mass,
            propellant_remaining: s.mass - config.dry_mass,
            approach_entry: entry(Stage::Approach),
            final_entry: entry(Stage::Final),
        }
    }
}
