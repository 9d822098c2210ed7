pub mod control;
pub mod controller;
pub mod guidance;
pub mod navigation;
pub mod poly;

pub use control::{limit_slew, limit_thrust, DescentController};
pub use controller::Controller;
pub use guidance::{Guidance, GuidancePlan, GuidanceTarget, Stage, Waypoint};
pub use navigation::{AlphaBetaFilter, Altimeter, DownrangePolicy, Navigation, NavigationConfig};
pub use poly::CubicPolynomial;
