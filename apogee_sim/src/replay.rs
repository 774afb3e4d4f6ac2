// apogee_sim/src/replay.rs

//! Replays recorded IMU samples through the attitude estimator.

use apogee_core::error::{ConfigError, EstimatorError};
use apogee_core::estimation::{AttitudeConfig, AttitudeEstimator};
use apogee_core::models::measurement::ImuSample;
use apogee_core::types::{Quat, Vec3};

/// The estimator's view after one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayFrame {
    pub timestamp: f64,
    pub orientation: Quat,
    /// The sample's specific force expressed in world axes. `None` when the
    /// reading itself is not finite.
    pub world_acceleration: Option<Vec3>,
    /// Set when the sample was rejected; the orientation is then the
    /// previous estimate.
    pub error: Option<EstimatorError>,
}

#[derive(Debug, Clone)]
pub struct OrientationReplay {
    estimator: AttitudeEstimator,
}

impl OrientationReplay {
    pub fn new(config: AttitudeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            estimator: AttitudeEstimator::new(config)?,
        })
    }

    pub fn from_estimator(estimator: AttitudeEstimator) -> Self {
        Self { estimator }
    }

    /// Processes one sample. Rejected samples leave the estimate untouched
    /// and are reported in the frame rather than stopping the replay.
    pub fn push(&mut self, sample: &ImuSample) -> ReplayFrame {
        let mut error = self.estimator.process(sample).err();
        let body_accel = self.estimator.config().axis_mapping.apply(&sample.accel);
        let world_acceleration = match self.estimator.to_world(&body_accel) {
            Ok(world) => Some(world),
            Err(err) => {
                error.get_or_insert(err.into());
                None
            }
        };
        ReplayFrame {
            timestamp: sample.timestamp,
            orientation: self.estimator.orientation(),
            world_acceleration,
            error,
        }
    }

    pub fn replay<'a>(
        &mut self,
        samples: impl IntoIterator<Item = &'a ImuSample>,
    ) -> Vec<ReplayFrame> {
        samples.into_iter().map(|sample| self.push(sample)).collect()
    }

    pub fn estimator(&self) -> &AttitudeEstimator {
        &self.estimator
    }
}
