use log::{debug, info, warn};

use crate::config::{Config, ConfigError, SimConfig};
use crate::dynamics::state::PhysicalState;
use crate::error::GncError;
use crate::gnc::{
    Controller, DescentController, Guidance, GuidancePlan, Navigation, NavigationConfig,
};
use crate::telemetry::{Telemetry, TelemetryRecord, TelemetrySink};
use super::event::{
    EventDetector, EventKind, FuelExhaustionDetector, SimEvent, TouchdownDetector,
};
use super::simulation::Simulation;

// ---------------------------------------------------------------------------
// Outcome of a descent run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DescentOutcome {
    pub time: f64, // s, time at the end of the last tick
    pub ticks: usize,
    pub landed: bool,
    pub final_state: PhysicalState,
    pub events: Vec<SimEvent>,
}

// ---------------------------------------------------------------------------
// Closed-loop descent: Navigation -> Guidance -> Control -> Dynamics
// ---------------------------------------------------------------------------

/// Run the loop with caller-supplied components until touchdown or the time
/// cap. One telemetry record is emitted per tick, before the dynamics step.
///
/// Both configurations are validated before the first tick.
pub fn simulate_with<S: TelemetrySink + ?Sized>(
    config: &SimConfig,
    navigation: &mut Navigation,
    guidance: &mut Guidance,
    controller: &mut dyn Controller,
    simulation: &mut Simulation,
    sink: &mut S,
) -> Result<DescentOutcome, GncError> {
    config.validate()?;
    simulation.config().validate()?;
    if simulation.altitude() <= 0.0 {
        return Err(ConfigError::StartBelowSurface(simulation.altitude()).into());
    }

    let dt = config.dt;
    let vehicle = *simulation.config();
    let mut detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(TouchdownDetector::new(vehicle.body_radius)),
        Box::new(FuelExhaustionDetector::new(vehicle.dry_mass)),
    ];
    let mut events = Vec::new();
    let mut ticks = 0_usize;
    let mut time = 0.0;

    info!(
        "descent start: altitude {:.0} m, dt {} s, cap {} s, controller {}",
        simulation.altitude(),
        dt,
        config.max_time,
        controller.name()
    );

    let landed = loop {
        let truth = *simulation.state();

        let nav = navigation.step(dt, &truth)?;
        let prev_stage = guidance.stage();
        let target = guidance.step(dt, &nav)?;
        if target.stage != prev_stage {
            events.push(SimEvent {
                time,
                kind: EventKind::StageTransition { from: prev_stage, to: target.stage },
                state: truth,
            });
        }
        let cmd = controller.control(dt, &nav, &target);

        sink.record(&TelemetryRecord::new(
            time,
            &truth,
            &nav,
            &target,
            &cmd,
            simulation.delivered_thrust(&cmd),
            simulation.fuel_exhausted(),
        ))?;

        simulation.step(&cmd, dt)?;
        ticks += 1;
        time = ticks as f64 * dt;

        let current = *simulation.state();
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&truth, &current) {
                debug!("{:?} at t = {:.1} s", kind, time);
                events.push(SimEvent { time, kind, state: current });
            }
        }

        if simulation.has_landed() {
            break true;
        }
        if time >= config.max_time {
            warn!(
                "time cap {} s reached at altitude {:.1} m without touchdown",
                config.max_time,
                simulation.altitude()
            );
            events.push(SimEvent { time, kind: EventKind::Timeout, state: current });
            break false;
        }
    };

    let final_state = *simulation.state();
    info!(
        "descent end: {} at t = {:.1} s, vertical speed {:.2} m/s, propellant left {:.0} kg",
        if landed { "touchdown" } else { "timeout" },
        time,
        final_state.dr,
        final_state.mass - vehicle.dry_mass
    );

    Ok(DescentOutcome {
        time,
        ticks,
        landed,
        final_state,
        events,
    })
}

/// Simulate with the default navigation, guidance plan and controller.
pub fn simulate(
    config: &Config,
    sim_config: &SimConfig,
) -> Result<(DescentOutcome, Telemetry), GncError> {
    config.validate()?;
    let mut navigation = Navigation::new(config, NavigationConfig::default());
    let mut guidance = Guidance::new(GuidancePlan::default());
    let mut controller = DescentController::new(config);
    let mut simulation = Simulation::new(config);

    let capacity = (sim_config.max_time / sim_config.dt).max(0.0) as usize + 1;
    let mut telemetry = Telemetry::with_capacity(capacity.min(200_000));

    let outcome = simulate_with(
        sim_config,
        &mut navigation,
        &mut guidance,
        &mut controller,
        &mut simulation,
        &mut telemetry,
    )?;
    Ok((outcome, telemetry))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
