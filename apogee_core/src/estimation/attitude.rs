// apogee_core/src/estimation/attitude.rs

//! Complementary-filter attitude estimation from a 6-axis IMU.
//!
//! The gyroscope is integrated to predict the orientation, then the
//! prediction is nudged towards the orientation implied by the accelerometer
//! (which, at rest, points along gravity). With no magnetometer the yaw
//! about the reference axis is unobservable and drifts with gyro bias.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, EstimatorError, MathError};
use crate::math::quaternion::{alignment, integrate, rotate, slerp, MIN_NORM};
use crate::models::measurement::{AxisMapping, ImuSample};
use crate::types::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttitudeConfig {
    /// Weight β of the accelerometer correction per update, in `[0, 1]`.
    /// Zero trusts the gyro alone; one snaps to the accelerometer.
    pub blend_factor: f64,
    /// Direction the accelerometer reports at rest, in world axes.
    pub reference_down: Vec3,
    /// Sensor-to-body remapping applied by [`AttitudeEstimator::process`].
    pub axis_mapping: AxisMapping,
}

impl Default for AttitudeConfig {
    fn default() -> Self {
        Self {
            blend_factor: 0.02,
            reference_down: Vec3::new(0.0, 0.0, -1.0),
            axis_mapping: AxisMapping::identity(),
        }
    }
}

impl AttitudeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.blend_factor) {
            return Err(ConfigError::OutOfUnitRange {
                name: "blend factor",
                value: self.blend_factor,
            });
        }
        let reference = &self.reference_down;
        if !reference.iter().all(|c| c.is_finite()) || reference.norm() == 0.0 {
            return Err(ConfigError::DegenerateReference);
        }
        Ok(())
    }
}

/// Tracks a single body-to-world orientation.
#[derive(Debug, Clone)]
pub struct AttitudeEstimator {
    config: AttitudeConfig,
    orientation: Quat,
    last_timestamp: Option<f64>,
}

impl AttitudeEstimator {
    /// Starts level, at the identity orientation.
    pub fn new(config: AttitudeConfig) -> Result<Self, ConfigError> {
        Self::with_orientation(config, Quat::identity())
    }

    pub fn with_orientation(config: AttitudeConfig, initial: Quat) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            orientation: initial,
            last_timestamp: None,
        })
    }

    /// Runs one predict/correct cycle with body-frame readings.
    ///
    /// `gyro` is in rad/s. An `accel` shorter than [`MIN_NORM`] carries no
    /// direction, so only the gyro prediction is applied. On error the
    /// estimate is left as it was.
    pub fn update(&mut self, accel: &Vec3, gyro: &Vec3, dt: f64) -> Result<Quat, EstimatorError> {
        match self.estimate(accel, gyro, dt) {
            Ok(q) => {
                self.orientation = q;
                Ok(q)
            }
            Err(err) => {
                warn!(error = %err, dt, "Rejected attitude update, keeping previous estimate");
                Err(err.into())
            }
        }
    }

    fn estimate(&self, accel: &Vec3, gyro: &Vec3, dt: f64) -> Result<Quat, MathError> {
        let predicted = integrate(&self.orientation, gyro, dt)?;
        if accel.norm() < MIN_NORM {
            return Ok(predicted);
        }
        let measured = alignment(accel, &self.config.reference_down)?;
        slerp(&predicted, &measured, self.config.blend_factor)
    }

    /// Feeds a timestamped sample in sensor axes.
    ///
    /// The step is the time since the previous accepted sample; the first
    /// sample only applies the accelerometer correction.
    pub fn process(&mut self, sample: &ImuSample) -> Result<Quat, EstimatorError> {
        if !sample.timestamp.is_finite() {
            return Err(MathError::NonFinite("process").into());
        }
        let dt = match self.last_timestamp {
            None => 0.0,
            Some(previous) if sample.timestamp < previous => {
                warn!(timestamp = sample.timestamp, previous, "IMU sample out of order");
                return Err(EstimatorError::NonMonotonicTimestamp {
                    timestamp: sample.timestamp,
                    previous,
                });
            }
            Some(previous) => sample.timestamp - previous,
        };

        let mapping = &self.config.axis_mapping;
        let accel = mapping.apply(&sample.accel);
        let gyro = mapping.apply(&sample.gyro);

        let q = self.update(&accel, &gyro, dt)?;
        self.last_timestamp = Some(sample.timestamp);
        Ok(q)
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Expresses a body-frame vector in world axes using the current estimate.
    pub fn to_world(&self, v: &Vec3) -> Result<Vec3, MathError> {
        rotate(v, &self.orientation)
    }

    /// Replaces the estimate and forgets the last sample time.
    pub fn reset(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.last_timestamp = None;
    }

    pub fn config(&self) -> &AttitudeConfig {
        &self.config
    }
}
