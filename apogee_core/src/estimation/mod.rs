// apogee_core/src/estimation/mod.rs

pub mod attitude;

pub use attitude::{AttitudeConfig, AttitudeEstimator};
