// apogee_core/src/models/measurement/sample_hold.rs

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Noise and refresh characteristics of a scalar sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorConfig {
    /// Standard deviation of the additive Gaussian noise, in the sensor's units.
    pub noise_std_dev: f64,
    /// Minimum time between two fresh readings [s].
    pub min_interval: f64,
}

impl SensorConfig {
    /// Barometric altimeter: 0.5 m noise, refreshed every 275 ms.
    pub fn barometer() -> Self {
        Self {
            noise_std_dev: 0.5,
            min_interval: 0.275,
        }
    }

    /// Vertical accelerometer: 0.1 m/s² noise, refreshed every millisecond.
    pub fn accelerometer() -> Self {
        Self {
            noise_std_dev: 0.1,
            min_interval: 0.001,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_non_negative("noise standard deviation", self.noise_std_dev)?;
        ConfigError::require_non_negative("minimum sensor interval", self.min_interval)?;
        Ok(())
    }
}

/// The value a sensor currently reports and when it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorReading {
    pub value: f64,
    pub time: f64,
}

/// Wraps a true signal with latency and noise.
///
/// A fresh noisy sample is taken only once `min_interval` has elapsed since
/// the previous one; in between, the last reading is held. Before the first
/// refresh the sensor reports `0.0`, as if a reading was taken at `t = 0`.
#[derive(Debug, Clone)]
pub struct SampleAndHold<R> {
    config: SensorConfig,
    noise: Normal<f64>,
    rng: R,
    reading: SensorReading,
}

impl<R: Rng> SampleAndHold<R> {
    pub fn new(config: SensorConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let noise = Normal::new(0.0, config.noise_std_dev).map_err(|_| ConfigError::Negative {
            name: "noise standard deviation",
            value: config.noise_std_dev,
        })?;
        Ok(Self {
            config,
            noise,
            rng,
            reading: SensorReading::default(),
        })
    }

    /// Reports the sensor output at time `t` for the current `true_value`.
    pub fn poll(&mut self, true_value: f64, t: f64) -> f64 {
        if t - self.reading.time >= self.config.min_interval {
            self.reading = SensorReading {
                value: true_value + self.noise.sample(&mut self.rng),
                time: t,
            };
        }
        self.reading.value
    }

    pub fn reading(&self) -> SensorReading {
        self.reading
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_holds_until_interval_elapses() {
        let config = SensorConfig {
            noise_std_dev: 0.0,
            min_interval: 0.25,
        };
        let mut sensor = SampleAndHold::new(config, ChaCha8Rng::seed_from_u64(0)).unwrap();

        // Nothing has been sampled yet.
        assert_eq!(sensor.poll(10.0, 0.0), 0.0);
        assert_eq!(sensor.poll(10.0, 0.2), 0.0);

        assert_eq!(sensor.poll(10.0, 0.25), 10.0);
        assert_eq!(sensor.poll(99.0, 0.3), 10.0);
        assert_eq!(sensor.reading(), SensorReading { value: 10.0, time: 0.25 });

        assert_eq!(sensor.poll(99.0, 0.5), 99.0);
    }

    #[test]
    fn test_noise_draw_is_reproducible() {
        let seed = 42;
        let config = SensorConfig::barometer();
        let mut sensor = SampleAndHold::new(config, ChaCha8Rng::seed_from_u64(seed)).unwrap();

        let mut reference_rng = ChaCha8Rng::seed_from_u64(seed);
        let expected_noise = Normal::new(0.0, 0.5).unwrap().sample(&mut reference_rng);

        let value = sensor.poll(100.0, 0.3);
        assert_relative_eq!(value, 100.0 + expected_noise, epsilon = 1e-12);
        // Held, so the RNG is not consumed again.
        assert_eq!(sensor.poll(250.0, 0.4), value);
    }

    #[test]
    fn test_noise_statistics() {
        let config = SensorConfig {
            noise_std_dev: 2.0,
            min_interval: 0.0,
        };
        let mut sensor = SampleAndHold::new(config, ChaCha8Rng::seed_from_u64(7)).unwrap();
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|i| sensor.poll(5.0, i as f64)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        assert!((mean - 5.0).abs() < 0.1, "mean {mean}");
        assert!((var.sqrt() - 2.0).abs() < 0.1, "std dev {}", var.sqrt());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let rng = ChaCha8Rng::seed_from_u64(0);
        let negative_noise = SensorConfig {
            noise_std_dev: -0.1,
            min_interval: 0.1,
        };
        assert!(SampleAndHold::new(negative_noise, rng.clone()).is_err());
        let nan_interval = SensorConfig {
            noise_std_dev: 0.1,
            min_interval: f64::NAN,
        };
        assert!(SampleAndHold::new(nan_interval, rng).is_err());
    }
}
