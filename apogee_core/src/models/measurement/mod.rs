// apogee_core/src/models/measurement/mod.rs

//! Synthetic sensor models and sensor-frame conventions.

pub mod axes;
pub mod sample_hold;

pub use axes::{AxisMapping, ImuSample};
pub use sample_hold::{SampleAndHold, SensorConfig, SensorReading};
