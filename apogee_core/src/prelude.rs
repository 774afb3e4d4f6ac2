// apogee_core/src/prelude.rs

// --- Errors ---
pub use crate::error::{ConfigError, EstimatorError, MathError};

// --- Core Data Structures ---
pub use crate::types::{FlightState, Quat, StateVector, Vec3};

// --- Models ---
pub use crate::models::dynamics::{Vehicle, VehicleParams};
pub use crate::models::environment::{CelestialBody, Environment};
pub use crate::models::measurement::{
    AxisMapping, ImuSample, SampleAndHold, SensorConfig, SensorReading,
};
pub use crate::models::propulsion::{ConstantThrust, TabulatedThrust, ThrustSample, ThrustSource};

// --- Estimation ---
pub use crate::estimation::{AttitudeConfig, AttitudeEstimator};

// --- Integration ---
pub use crate::utils::integrators::{Integrator, Stepper, RK1, RK4};
