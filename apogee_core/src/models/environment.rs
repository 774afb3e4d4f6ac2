// apogee_core/src/models/environment.rs

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Newtonian gravitational constant [m³/(kg·s²)].
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674080324960551e-11;

/// Standard sea-level pressure [Pa].
pub const SEA_LEVEL_PRESSURE: f64 = 101_325.0;

// International barometric formula (troposphere fit).
const BAROMETRIC_HEIGHT: f64 = 44_330.0;
const BAROMETRIC_EXPONENT: f64 = 0.1903;

/// The surroundings a vehicle flies through.
pub trait Environment: std::fmt::Debug + Send + Sync {
    /// Signed gravitational acceleration at `altitude` [m/s²], negative (downward).
    fn gravity(&self, altitude: f64) -> f64;

    /// Atmospheric density at `altitude` [kg/m³].
    fn density(&self, altitude: f64) -> f64;
}

/// A spherical body with an exponential atmosphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    /// Gravitational parameter GM [m³/s²].
    pub gm: f64,
    /// Mean radius [m].
    pub radius: f64,
    /// Density used at and below the surface [kg/m³].
    pub sea_level_density: f64,
    /// Atmospheric scale height H [m].
    pub scale_height: f64,
}

impl CelestialBody {
    /// Builds a body from its mass [kg] and mean radius [m], with an
    /// Earth-like atmosphere.
    pub fn new(mass: f64, radius: f64) -> Result<Self, ConfigError> {
        let mass = ConfigError::require_positive("body mass", mass)?;
        let radius = ConfigError::require_positive("body radius", radius)?;
        Ok(Self {
            gm: GRAVITATIONAL_CONSTANT * mass,
            radius,
            sea_level_density: 1.225,
            scale_height: 8500.0,
        })
    }

    pub fn earth() -> Self {
        Self {
            gm: GRAVITATIONAL_CONSTANT * 5.972365131085893e24,
            radius: 6_371_000.0,
            sea_level_density: 1.225,
            scale_height: 8500.0,
        }
    }

    /// Replaces the atmosphere. A zero sea-level density gives a vacuum.
    pub fn with_atmosphere(
        mut self,
        sea_level_density: f64,
        scale_height: f64,
    ) -> Result<Self, ConfigError> {
        self.sea_level_density =
            ConfigError::require_non_negative("sea level density", sea_level_density)?;
        self.scale_height = ConfigError::require_positive("scale height", scale_height)?;
        Ok(self)
    }

    /// Gravitational acceleration at the surface [m/s²], negative.
    pub fn surface_gravity(&self) -> f64 {
        self.gravity(0.0)
    }
}

impl Default for CelestialBody {
    fn default() -> Self {
        Self::earth()
    }
}

impl Environment for CelestialBody {
    /// Inverse-square law. Only meaningful above the body's centre
    /// (`altitude > -radius`).
    fn gravity(&self, altitude: f64) -> f64 {
        let r = self.radius + altitude;
        -self.gm / (r * r)
    }

    fn density(&self, altitude: f64) -> f64 {
        if altitude > 0.0 {
            self.sea_level_density * (-altitude / self.scale_height).exp()
        } else {
            self.sea_level_density
        }
    }
}

/// Static pressure at `altitude` given the reference pressure `p0` at zero altitude [Pa].
pub fn pressure_at(altitude: f64, p0: f64) -> f64 {
    p0 * (1.0 - altitude / BAROMETRIC_HEIGHT).powf(1.0 / BAROMETRIC_EXPONENT)
}

/// Altitude above the `p0` reference level for a measured pressure, the
/// conversion a flight computer applies to its barometer.
pub fn altitude_from_pressure(pressure: f64, p0: f64) -> f64 {
    BAROMETRIC_HEIGHT * (1.0 - (pressure / p0).powf(BAROMETRIC_EXPONENT))
}
