// apogee_core/src/types.rs

use nalgebra::{SVector, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// --- Core Type Aliases ---
/// 3D vector type (accelerations, angular rates, directions).
pub type Vec3 = Vector3<f64>;

/// Orientation. Rotates body-frame vectors into the world frame.
pub type Quat = UnitQuaternion<f64>;

/// The flat vector the integrator advances: `[altitude, velocity]`.
pub type StateVector = SVector<f64, 2>;

/// Vertical state of the vehicle. Named view over the integrator's flat
/// `[altitude, velocity]` vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlightState {
    /// Height above the ground [m].
    pub altitude: f64,
    /// Vertical velocity, positive up [m/s].
    pub velocity: f64,
}

impl FlightState {
    pub fn new(altitude: f64, velocity: f64) -> Self {
        Self { altitude, velocity }
    }

    pub fn to_vector(self) -> StateVector {
        StateVector::new(self.altitude, self.velocity)
    }

    pub fn from_vector(x: &StateVector) -> Self {
        Self {
            altitude: x[0],
            velocity: x[1],
        }
    }
}

impl From<FlightState> for StateVector {
    fn from(state: FlightState) -> Self {
        state.to_vector()
    }
}
