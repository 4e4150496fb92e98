use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_GRAVITY;
use crate::error::ConfigError;

/// Per-map environment scalars. The host may reassign them every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Signed horizontal wind strength (positive blows towards +x).
    #[serde(default)]
    pub wind: f32,
    #[serde(default)]
    pub air_resistance: f32,
}

fn default_gravity() -> f32 {
    DEFAULT_GRAVITY
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            wind: 0.0,
            air_resistance: 0.0,
        }
    }
}

impl Environment {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("gravity", self.gravity)?;
        check_finite("wind", self.wind)?;
        check_finite("air_resistance", self.air_resistance)
    }
}

/// How strongly a projectile reacts to each environment scalar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileParams {
    #[serde(default = "one")]
    pub mass: f32,
    #[serde(default = "one")]
    pub gravity_factor: f32,
    #[serde(default = "one")]
    pub wind_factor: f32,
    #[serde(default = "one")]
    pub air_resist_factor: f32,
}

fn one() -> f32 {
    1.0
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity_factor: 1.0,
            wind_factor: 1.0,
            air_resist_factor: 1.0,
        }
    }
}

impl ProjectileParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigError::InvalidMass(self.mass));
        }
        check_finite("gravity_factor", self.gravity_factor)?;
        check_finite("wind_factor", self.wind_factor)?;
        check_finite("air_resist_factor", self.air_resist_factor)
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

/// Parse any RON document into `T`. `what` names the document in errors.
pub fn parse_ron<T: DeserializeOwned>(what: &'static str, ron_str: &str) -> Result<T, ConfigError> {
    let options = ron::Options::default();
    options.from_str(ron_str).map_err(|e| ConfigError::Parse {
        what,
        message: e.to_string(),
    })
}

/// Parse and validate an environment from a RON string.
pub fn load_environment_from_str(ron_str: &str) -> Result<Environment, ConfigError> {
    let env: Environment = parse_ron("environment", ron_str)?;
    env.validate()?;
    Ok(env)
}

/// Parse and validate projectile parameters from a RON string.
pub fn load_projectile_params_from_str(ron_str: &str) -> Result<ProjectileParams, ConfigError> {
    let params: ProjectileParams = parse_ron("projectile", ron_str)?;
    params.validate()?;
    Ok(params)
}
