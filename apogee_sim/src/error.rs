// apogee_sim/src/error.rs

use apogee_core::error::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to load scenario: {0}")]
    Scenario(#[from] figment::Error),

    #[error("failed to write scenario: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid model configuration: {0}")]
    Model(#[from] ConfigError),

    #[error("could not seed the simulation RNG: {0}")]
    Entropy(#[from] rand::Error),
}
