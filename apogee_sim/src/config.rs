// apogee_sim/src/config.rs

//! Scenario files: everything needed to build and run one flight.
//!
//! Every section is optional. Values missing from the file keep the
//! defaults below, field by field.

use std::path::Path;

use apogee_core::error::ConfigError;
use apogee_core::estimation::AttitudeConfig;
use apogee_core::models::dynamics::VehicleParams;
use apogee_core::models::environment::CelestialBody;
use apogee_core::models::measurement::SensorConfig;
use apogee_core::models::propulsion::{ConstantThrust, TabulatedThrust, ThrustSample, ThrustSource};
use apogee_core::types::FlightState;
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SimError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub body: BodyConfig,
    #[serde(default)]
    pub vehicle: VehicleParams,
    // `[[engines]]` tables, one per motor.
    #[serde(default)]
    pub engines: Vec<EngineConfig>,
    #[serde(default)]
    pub sensors: SensorsConfig,
    #[serde(default)]
    pub attitude: AttitudeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    /// Fixed step [s].
    pub dt: f64,
    /// Length of a full run [s].
    pub duration: f64,
    /// Seed for sensor noise. Without one every run differs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub initial_altitude: f64,
    pub initial_velocity: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            dt: 0.05,
            duration: 8.0,
            seed: None,
            initial_altitude: 0.0,
            initial_velocity: 0.0,
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("dt", self.dt)?;
        ConfigError::require_non_negative("duration", self.duration)?;
        ConfigError::require_non_negative("initial altitude", self.initial_altitude)?;
        if !self.initial_velocity.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "initial velocity",
                value: self.initial_velocity,
            });
        }
        Ok(())
    }

    pub fn initial_state(&self) -> FlightState {
        FlightState::new(self.initial_altitude, self.initial_velocity)
    }
}

/// The body the vehicle flies from. Defaults to Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    /// [kg]
    pub mass: f64,
    /// [m]
    pub radius: f64,
    pub sea_level_density: f64,
    pub scale_height: f64,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            mass: 5.972365131085893e24,
            radius: 6_371_000.0,
            sea_level_density: 1.225,
            scale_height: 8500.0,
        }
    }
}

impl BodyConfig {
    pub fn build(&self) -> Result<CelestialBody, ConfigError> {
        CelestialBody::new(self.mass, self.radius)?
            .with_atmosphere(self.sea_level_density, self.scale_height)
    }
}

/// One motor, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", deny_unknown_fields)]
pub enum EngineConfig {
    Tabulated {
        samples: Vec<ThrustSample>,
    },
    Constant {
        thrust: f64,
        burn_time: f64,
        initial_mass: f64,
        final_mass: f64,
    },
}

impl EngineConfig {
    pub fn build(&self) -> Result<Box<dyn ThrustSource>, ConfigError> {
        let engine: Box<dyn ThrustSource> = match self {
            EngineConfig::Tabulated { samples } => Box::new(TabulatedThrust::new(samples.clone())?),
            EngineConfig::Constant {
                thrust,
                burn_time,
                initial_mass,
                final_mass,
            } => Box::new(ConstantThrust::new(
                *thrust,
                *burn_time,
                *initial_mass,
                *final_mass,
            )?),
        };
        Ok(engine)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorsConfig {
    pub barometer: SensorConfig,
    pub accelerometer: SensorConfig,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            barometer: SensorConfig::barometer(),
            accelerometer: SensorConfig::accelerometer(),
        }
    }
}

impl ScenarioConfig {
    /// Loads a scenario file on top of the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading scenario");
        let config: Self = Self::figment().merge(Toml::file(path)).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, SimError> {
        let config: Self = Self::figment().merge(Toml::string(toml)).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, SimError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    /// Checks every section without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.body.build()?;
        self.vehicle.validate()?;
        for engine in &self.engines {
            engine.build()?;
        }
        self.sensors.barometer.validate()?;
        self.sensors.accelerometer.validate()?;
        self.attitude.validate()
    }
}
