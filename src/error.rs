use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while running the descent loop.
///
/// Physical guardrails (fuel exhaustion, thrust saturation, slew clamping)
/// are not errors; they show up in telemetry instead.
#[derive(Debug, Error)]
pub enum GncError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("time step must be positive, got {0} s")]
    NonPositiveTimestep(f64),
    #[error("trajectory horizon must be positive, got {0} s")]
    NonPositiveHorizon(f64),
    #[error("cubic boundary system is singular for horizon {0} s")]
    SingularTrajectory(f64),
    #[error("altimeter noise model: {0}")]
    Noise(#[from] rand_distr::NormalError),
    #[error("telemetry export failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Shared guard for every component that divides by the tick size.
pub(crate) fn check_timestep(dt: f64) -> Result<(), GncError> {
    if dt > 0.0 && dt.is_finite() {
        Ok(())
    } else {
        Err(GncError::NonPositiveTimestep(dt))
    }
}
