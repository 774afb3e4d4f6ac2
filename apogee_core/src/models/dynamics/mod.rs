// apogee_core/src/models/dynamics/mod.rs

//! Equations of motion for the simulated vehicle.

pub mod vertical;

pub use vertical::{Vehicle, VehicleParams};
