// apogee_core/src/math/mod.rs

//! Vector and quaternion helpers for orientation work.

pub mod quaternion;

pub use quaternion::{alignment, conjugate, integrate, multiply, normalize, rotate, slerp, unit};
