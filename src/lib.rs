pub mod config;
pub mod dynamics;
pub mod error;
mod gnc_mod;
pub mod io;
pub mod sim;
pub mod telemetry;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub use config::{presets, Config, ConfigBuilder, ConfigError, SimConfig};
pub use error::GncError;
pub use sim::{simulate, simulate_with, DescentOutcome};
pub use telemetry::{DescentSummary, Telemetry, TelemetryRecord, TelemetrySink};
