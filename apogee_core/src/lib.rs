// apogee_core/src/lib.rs

//! Numerical core for simulating a small single-stage vehicle in vertical
//! flight and for estimating its attitude from a 6-axis IMU.

pub mod error;
pub mod estimation;
pub mod math;
pub mod models;
pub mod prelude;
pub mod types;
pub mod utils;
