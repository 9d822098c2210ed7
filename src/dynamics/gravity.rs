/// Inverse-square gravitational acceleration magnitude at radius r.
pub fn gravity_accel(mu: f64, r: f64) -> f64 {
    mu / (r * r)
}

/// Centripetal acceleration of horizontal motion, r * dtheta^2.
/// Offsets gravity in the rotating local frame.
pub fn centrifugal_accel(r: f64, dtheta: f64) -> f64 {
    r * dtheta * dtheta
}

/// Coupling between vertical and angular motion in the rotating frame.
pub fn coriolis_accel(dr: f64, dtheta: f64) -> f64 {
    2.0 * dr * dtheta
}

/// Horizontal speed at which centrifugal relief cancels gravity.
pub fn circular_speed(mu: f64, r: f64) -> f64 {
    (mu / r).sqrt()
}
