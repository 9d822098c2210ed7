use crate::dynamics::state::{ActuatorCommand, LocalFrameState};
use super::guidance::GuidanceTarget;

/// Trait for descent controllers.
///
/// Implement this to plug a custom control law into the simulation loop.
pub trait Controller {
    /// Turn the guidance acceleration demand into a limited actuator command.
    fn control(
        &mut self,
        dt: f64,
        nav: &LocalFrameState,
        target: &GuidanceTarget,
    ) -> ActuatorCommand;

    /// Reset controller internal state (e.g. the last applied pitch).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
