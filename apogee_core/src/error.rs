// apogee_core/src/error.rs

use thiserror::Error;

/// Construction-time misconfiguration. Returned by every validating
/// constructor; nothing is partially built when one of these comes back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("thrust profile has no samples")]
    EmptyThrustProfile,

    #[error("thrust sample {index} is invalid: {reason}")]
    InvalidThrustSample { index: usize, reason: &'static str },

    #[error("thrust sample {index} at t = {time} s precedes the previous sample at t = {previous} s")]
    UnorderedThrustSamples {
        index: usize,
        time: f64,
        previous: f64,
    },

    #[error("`{name}` must be strictly positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("`{name}` must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("`{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("`{name}` must lie within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },

    #[error("axis mapping must be a signed permutation matrix: {0}")]
    InvalidAxisMapping(&'static str),

    #[error("reference vector must be finite and non-zero")]
    DegenerateReference,
}

impl ConfigError {
    pub fn require_positive(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(Self::NotPositive { name, value })
        }
    }

    pub fn require_non_negative(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::Negative { name, value })
        }
    }
}

/// A numerical degeneracy that no documented fallback can absorb.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MathError {
    #[error("non-finite input to `{0}`")]
    NonFinite(&'static str),

    #[error("zero-length vector passed to `{0}` where a direction is required")]
    ZeroNorm(&'static str),

    #[error("quaternion renormalization failed (norm = {0})")]
    Renormalization(f64),
}

/// An attitude-estimator fault. The estimate is left untouched whenever one
/// of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EstimatorError {
    #[error("estimator fault: {0}")]
    Numerical(#[from] MathError),

    #[error("IMU sample at t = {timestamp} s is older than the previous one at t = {previous} s")]
    NonMonotonicTimestamp { timestamp: f64, previous: f64 },
}
