use nalgebra::{Matrix4, Vector4};

use crate::error::GncError;

// ---------------------------------------------------------------------------
// Cubic boundary-value trajectory: f(t) = a t^3 + b t^2 + c t + d
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicPolynomial {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl CubicPolynomial {
    /// Fit the cubic through position and rate at both ends of [0, tf].
    ///
    /// Rows: f(0) = f0, f(tf) = ff, f'(0) = df0, f'(tf) = dff.
    pub fn fit(tf: f64, f0: f64, ff: f64, df0: f64, dff: f64) -> Result<Self, GncError> {
        if !(tf > 0.0) {
            return Err(GncError::NonPositiveHorizon(tf));
        }
        let tf2 = tf * tf;
        let tf3 = tf2 * tf;
        #[rustfmt::skip]
        let m = Matrix4::new(
            0.0,       0.0,       0.0, 1.0,
            tf3,       tf2,       tf,  1.0,
            0.0,       0.0,       1.0, 0.0,
            3.0 * tf2, 2.0 * tf,  1.0, 0.0,
        );
        let rhs = Vector4::new(f0, ff, df0, dff);
        let coeffs = m.lu().solve(&rhs).ok_or(GncError::SingularTrajectory(tf))?;

        Ok(Self {
            a: coeffs[0],
            b: coeffs[1],
            c: coeffs[2],
            d: coeffs[3],
        })
    }

    pub fn position(&self, t: f64) -> f64 {
        ((self.a * t + self.b) * t + self.c) * t + self.d
    }

    pub fn rate(&self, t: f64) -> f64 {
        (3.0 * self.a * t + 2.0 * self.b) * t + self.c
    }

    pub fn accel(&self, t: f64) -> f64 {
        6.0 * self.a * t + 2.0 * self.b
    }

    /// Position, rate and acceleration at t.
    pub fn evaluate(&self, t: f64) -> (f64, f64, f64) {
        (self.position(t), self.rate(t), self.accel(t))
    }
}
