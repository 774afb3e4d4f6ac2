// apogee_core/src/models/mod.rs

pub mod dynamics;
pub mod environment;
pub mod measurement;
pub mod propulsion;
