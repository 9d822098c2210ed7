pub mod gravity;
pub mod polar;
pub mod state;

pub use polar::derivatives;
pub use state::{ActuatorCommand, Deriv, LocalFrameState, PhysicalState};
