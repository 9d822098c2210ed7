use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::dynamics::state::{LocalFrameState, PhysicalState};
use crate::error::{check_timestep, GncError};

// ---------------------------------------------------------------------------
// Alpha-beta filter (fixed-gain position/rate estimator)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaBetaFilter {
    pub alpha: f64,
    pub beta: f64,
    position: f64,
    rate: f64,
}

impl AlphaBetaFilter {
    pub fn new(alpha: f64, beta: f64, position: f64, rate: f64) -> Self {
        Self { alpha, beta, position, rate }
    }

    /// Predict forward by dt, then correct toward the measurement.
    pub fn update(&mut self, measurement: f64, dt: f64) -> Result<(f64, f64), GncError> {
        check_timestep(dt)?;
        let predicted = self.position + self.rate * dt;
        let residual = measurement - predicted;
        self.position = predicted + self.alpha * residual;
        self.rate += self.beta * residual / dt;
        Ok((self.position, self.rate))
    }

    pub fn estimate(&self) -> (f64, f64) {
        (self.position, self.rate)
    }
}

// ---------------------------------------------------------------------------
// Landing radar altimeter model
// ---------------------------------------------------------------------------

/// Altimeter with a fixed bias and altitude-proportional Gaussian noise.
///
/// The 3-sigma error is 1.5 % of altitude plus 1.52 m.
#[derive(Debug, Clone)]
pub struct Altimeter {
    bias: f64,
    rng: Pcg64Mcg,
}

impl Altimeter {
    pub fn new(bias: f64, seed: u64) -> Self {
        Self {
            bias,
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn sigma(altitude: f64) -> f64 {
        ((0.015 * altitude + 1.52) / 3.0).max(0.0)
    }

    pub fn measure(&mut self, altitude: f64) -> Result<f64, GncError> {
        let noise = Normal::new(0.0, Self::sigma(altitude))?;
        Ok(altitude + self.bias + self.rng.sample(noise))
    }
}

// ---------------------------------------------------------------------------
// Navigation component
// ---------------------------------------------------------------------------

/// How the horizontal channel of the local-frame estimate is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DownrangePolicy {
    /// Use the true downrange and horizontal velocity directly.
    #[default]
    PassThrough,
    /// Run the true downrange through its own alpha-beta filter.
    Filtered,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    pub bias: f64, // m, fixed altimeter bias
    pub seed: u64,
    pub alpha: f64,
    pub beta: f64,
    pub downrange: DownrangePolicy,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            bias: 1.0,
            seed: 42,
            alpha: 0.02,
            beta: 0.0004,
            downrange: DownrangePolicy::PassThrough,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Navigation {
    body_radius: f64,
    policy: DownrangePolicy,
    altimeter: Altimeter,
    vertical: AlphaBetaFilter,
    horizontal: AlphaBetaFilter,
    last_measurement: Option<f64>,
}

impl Navigation {
    /// Filters start at the configured initial state.
    pub fn new(config: &Config, nav: NavigationConfig) -> Self {
        let start = config.initial_state.to_local(config.body_radius);
        let filter = |position, rate| AlphaBetaFilter::new(nav.alpha, nav.beta, position, rate);
        Self {
            body_radius: config.body_radius,
            policy: nav.downrange,
            altimeter: Altimeter::new(nav.bias, nav.seed),
            vertical: filter(start.altitude, start.vertical_velocity),
            horizontal: filter(start.downrange, start.horizontal_velocity),
            last_measurement: None,
        }
    }

    /// Most recent raw altimeter reading.
    pub fn last_measurement(&self) -> Option<f64> {
        self.last_measurement
    }

    /// Measure, filter and return the local-frame estimate for this tick.
    pub fn step(&mut self, dt: f64, truth: &PhysicalState) -> Result<LocalFrameState, GncError> {
        check_timestep(dt)?;
        let local = truth.to_local(self.body_radius);

        let measured = self.altimeter.measure(local.altitude)?;
        self.last_measurement = Some(measured);
        let (altitude, vertical_velocity) = self.vertical.update(measured, dt)?;

        let (downrange, horizontal_velocity) = match self.policy {
            DownrangePolicy::PassThrough => (local.downrange, local.horizontal_velocity),
            DownrangePolicy::Filtered => self.horizontal.update(local.downrange, dt)?,
        };

        Ok(LocalFrameState {
            altitude,
            vertical_velocity,
            downrange,
            horizontal_velocity,
            mass: local.mass,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{presets, ConfigBuilder};
    use approx::assert_relative_eq;

    #[test]
    fn filter_predict_correct() {
        let mut f = AlphaBetaFilter::new(0.02, 0.0004, 100.0, -2.0);
        let (z, dz) = f.update(99.0, 0.1).unwrap();
        // predicted 99.8, residual -0.8
        assert_relative_eq!(z, 99.8 - 0.02 * 0.8, max_relative = 1e-12);
        assert_relative_eq!(dz, -2.0 - 0.0004 * 0.8 / 0.1, max_relative = 1e-12);
    }

    #[test]
    fn filter_tracks_constant_rate() {
        let mut f = AlphaBetaFilter::new(0.02, 0.0004, 1_000.0, 0.0);
        let dt = 0.1;
        let mut truth = 1_000.0;
        for _ in 0..20_000 {
            truth -= 5.0 * dt;
            f.update(truth, dt).unwrap();
        }
        let (z, dz) = f.estimate();
        assert!((dz + 5.0).abs() < 0.01, "rate {dz}");
        assert!((z - truth).abs() < 0.5, "position lag {}", z - truth);
    }

    #[test]
    fn filter_rejects_zero_dt() {
        let mut f = AlphaBetaFilter::new(0.02, 0.0004, 0.0, 0.0);
        assert!(matches!(f.update(1.0, 0.0), Err(GncError::NonPositiveTimestep(_))));
        assert!(matches!(f.update(1.0, -0.1), Err(GncError::NonPositiveTimestep(_))));
    }

    #[test]
    fn altimeter_noise_scales_with_altitude() {
        assert_relative_eq!(Altimeter::sigma(0.0), 1.52 / 3.0);
        assert_relative_eq!(Altimeter::sigma(10_000.0), (150.0 + 1.52) / 3.0);
    }

    #[test]
    fn altimeter_is_reproducible() {
        let mut a = Altimeter::new(1.0, 7);
        let mut b = Altimeter::new(1.0, 7);
        for _ in 0..100 {
            assert_eq!(a.measure(5_000.0).unwrap(), b.measure(5_000.0).unwrap());
        }
    }

    #[test]
    fn altimeter_mean_is_biased() {
        let mut a = Altimeter::new(1.0, 3);
        let n = 20_000;
        let mean = (0..n).map(|_| a.measure(100.0).unwrap() - 100.0).sum::<f64>() / n as f64;
        // sigma ~ 1.01 m, standard error ~ 0.007 m
        assert!((mean - 1.0).abs() < 0.05, "mean error {mean}");
    }

    #[test]
    fn downrange_passes_through_by_default() {
        let cfg = presets::apollo_lm();
        let mut nav = Navigation::new(&cfg, NavigationConfig::default());
        let truth = cfg.initial_state;
        let est = nav.step(0.1, &truth).unwrap();
        let local = truth.to_local(cfg.body_radius);
        assert_eq!(est.downrange, local.downrange);
        assert_eq!(est.horizontal_velocity, local.horizontal_velocity);
        assert_eq!(est.mass, truth.mass);
        assert!(nav.last_measurement().is_some());
    }

    #[test]
    fn filtered_downrange_lags_truth() {
        let cfg = presets::apollo_lm();
        let nav_cfg = NavigationConfig {
            downrange: DownrangePolicy::Filtered,
            ..Default::default()
        };
        let mut nav = Navigation::new(&cfg, nav_cfg);
        let mut truth = cfg.initial_state;
        truth.theta = 1e-3;
        let est = nav.step(0.1, &truth).unwrap();
        let local = truth.to_local(cfg.body_radius);
        assert!(est.downrange < local.downrange);
        assert!(est.downrange > 0.0);
    }

    #[test]
    fn estimate_stays_near_truth_at_low_altitude() {
        let cfg = ConfigBuilder::new().start_altitude(200.0, 0.0).build().unwrap();
        let mut nav = Navigation::new(&cfg, NavigationConfig::default());
        let truth = cfg.initial_state;
        let mut est = nav.step(0.1, &truth).unwrap();
        for _ in 0..2_000 {
            est = nav.step(0.1, &truth).unwrap();
        }
        // sigma ~ 1.5 m at 200 m; bias pulls the estimate up by 1 m
        assert!((est.altitude - 201.0).abs() < 3.0, "altitude {}", est.altitude);
        assert!(est.vertical_velocity.abs() < 1.0);
    }

    #[test]
    fn navigation_rejects_zero_dt() {
        let cfg = presets::apollo_lm();
        let mut nav = Navigation::new(&cfg, NavigationConfig::default());
        assert!(nav.step(0.0, &cfg.initial_state).is_err());
    }
}
