// apogee_sim/src/lib.rs

//! Drives `apogee_core` models: loads a scenario, flies the vehicle at a
//! fixed step while feeding sensor telemetry to a flight computer, and
//! replays IMU logs through the attitude estimator.

// This prelude is for convenience for users of the simulation crate.
pub mod prelude;

pub mod computer;
pub mod config;
pub mod error;
pub mod prng;
pub mod replay;
pub mod simulation;

pub use error::SimError;
