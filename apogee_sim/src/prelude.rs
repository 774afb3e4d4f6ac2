// apogee_sim/src/prelude.rs

// Re-export the core prelude so scenarios can name models directly.
pub use apogee_core::prelude::*;

pub use crate::computer::{FlightComputer, Telemetry, TelemetryRecorder};
pub use crate::config::{BodyConfig, EngineConfig, ScenarioConfig, SensorsConfig, SimulationSettings};
pub use crate::error::SimError;
pub use crate::prng::SimulationRng;
pub use crate::replay::{OrientationReplay, ReplayFrame};
pub use crate::simulation::{FlightRecord, FlightSimulation};
