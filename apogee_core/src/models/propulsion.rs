// apogee_core/src/models/propulsion.rs

use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::error::ConfigError;

// --- THRUST SOURCE TRAIT ---
// Anything that can push the vehicle: a tabulated motor curve, an analytic burn, ...
pub trait ThrustSource: DynClone + Debug + Send + Sync {
    /// Thrust at time `t` since ignition [N].
    fn thrust(&self, t: f64) -> f64;

    /// Mass of the engine (casing plus remaining propellant) at time `t` [kg].
    fn mass(&self, t: f64) -> f64;

    /// Time after which the engine produces no more thrust [s].
    fn burnout_time(&self) -> f64;
}

dyn_clone::clone_trait_object!(ThrustSource);

/// One row of a motor's thrust curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThrustSample {
    /// [s]
    pub time: f64,
    /// [N]
    pub thrust: f64,
    /// [kg]
    pub mass: f64,
}

impl ThrustSample {
    pub fn new(time: f64, thrust: f64, mass: f64) -> Self {
        Self { time, thrust, mass }
    }
}

/// A thrust curve given as samples, linearly interpolated between them.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedThrust {
    samples: Vec<ThrustSample>,
}

impl TabulatedThrust {
    /// Validates and wraps a time-ordered series of samples.
    ///
    /// Samples must be finite with non-negative time, thrust and mass, and
    /// their times must never decrease.
    pub fn new(samples: Vec<ThrustSample>) -> Result<Self, ConfigError> {
        if samples.is_empty() {
            return Err(ConfigError::EmptyThrustProfile);
        }

        for (index, sample) in samples.iter().enumerate() {
            let reason = if !(sample.time.is_finite()
                && sample.thrust.is_finite()
                && sample.mass.is_finite())
            {
                Some("values must be finite")
            } else if sample.time < 0.0 {
                Some("time must be non-negative")
            } else if sample.thrust < 0.0 {
                Some("thrust must be non-negative")
            } else if sample.mass < 0.0 {
                Some("mass must be non-negative")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(ConfigError::InvalidThrustSample { index, reason });
            }
        }

        if let Some(index) = samples.windows(2).position(|w| w[1].time < w[0].time) {
            return Err(ConfigError::UnorderedThrustSamples {
                index: index + 1,
                time: samples[index + 1].time,
                previous: samples[index].time,
            });
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[ThrustSample] {
        &self.samples
    }

    /// Linear interpolation of `field` at `t`. Values before the first
    /// sample and after the last are held at the end values.
    fn interpolate(&self, t: f64, field: impl Fn(&ThrustSample) -> f64) -> f64 {
        // First sample strictly after `t`.
        let upper = self.samples.partition_point(|s| s.time <= t);
        if upper == 0 {
            return field(&self.samples[0]);
        }
        let lo = &self.samples[upper - 1];
        let Some(hi) = self.samples.get(upper) else {
            return field(lo);
        };
        // lo.time <= t < hi.time, so the span is non-zero.
        let fraction = (t - lo.time) / (hi.time - lo.time);
        field(lo) + (field(hi) - field(lo)) * fraction
    }
}

impl ThrustSource for TabulatedThrust {
    fn thrust(&self, t: f64) -> f64 {
        if t > self.burnout_time() {
            return 0.0;
        }
        self.interpolate(t, |s| s.thrust)
    }

    fn mass(&self, t: f64) -> f64 {
        self.interpolate(t.min(self.burnout_time()), |s| s.mass)
    }

    fn burnout_time(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.time)
    }
}

/// A constant-thrust burn with propellant mass falling linearly to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantThrust {
    thrust: f64,
    burn_time: f64,
    initial_mass: f64,
    final_mass: f64,
}

impl ConstantThrust {
    pub fn new(
        thrust: f64,
        burn_time: f64,
        initial_mass: f64,
        final_mass: f64,
    ) -> Result<Self, ConfigError> {
        let thrust = ConfigError::require_non_negative("thrust", thrust)?;
        let burn_time = ConfigError::require_positive("burn time", burn_time)?;
        let final_mass = ConfigError::require_non_negative("final mass", final_mass)?;
        let initial_mass = ConfigError::require_non_negative("initial mass", initial_mass)?;
        if initial_mass < final_mass {
            // Engines only lose mass.
            return Err(ConfigError::Negative {
                name: "propellant mass",
                value: initial_mass - final_mass,
            });
        }
        Ok(Self {
            thrust,
            burn_time,
            initial_mass,
            final_mass,
        })
    }
}

impl ThrustSource for ConstantThrust {
    fn thrust(&self, t: f64) -> f64 {
        if (0.0..self.burn_time).contains(&t) {
            self.thrust
        } else {
            0.0
        }
    }

    fn mass(&self, t: f64) -> f64 {
        let burned = (t / self.burn_time).clamp(0.0, 1.0);
        self.initial_mass - (self.initial_mass - self.final_mass) * burned
    }

    fn burnout_time(&self) -> f64 {
        self.burn_time
    }
}
