use serde::Deserialize;

use crater_core::config::{parse_ron, Environment, ProjectileParams};
use crater_core::error::ConfigError;
use crater_core::geometry::Rect;
use crater_terrain::TerrainBitmap;

/// One benchmark scene: a hilly destructible field and a volley of shells
/// fired into it.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Mean ground height, measured from the top of the map.
    pub surface: i32,
    #[serde(default)]
    pub hill_amplitude: f32,
    #[serde(default = "default_hill_period")]
    pub hill_period: f32,
    pub shells: u32,
    /// Launch speed in pixels per second.
    pub launch_speed: f32,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub projectile: ProjectileParams,
    pub hole_diameter: u32,
    #[serde(default)]
    pub border_thickness: Option<u32>,
    #[serde(default = "default_dt")]
    pub dt: f32,
}

fn default_hill_period() -> f32 {
    200.0
}

fn default_dt() -> f32 {
    0.04
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "scene '{}' has a {}x{} map",
                self.name, self.width, self.height
            )));
        }
        if self.hole_diameter == 0 {
            return Err(invalid(format!("scene '{}' has no hole", self.name)));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(invalid(format!(
                "scene '{}' has dt {}",
                self.name, self.dt
            )));
        }
        self.environment.validate()?;
        self.projectile.validate()
    }

    /// Ground surface y at column `x`.
    pub fn surface_at(&self, x: i32) -> i32 {
        let phase = x as f32 / self.hill_period * std::f32::consts::TAU;
        self.surface + (self.hill_amplitude * phase.sin()) as i32
    }

    /// Destructible layer filled from the hill line down.
    pub fn build_ground(&self) -> TerrainBitmap {
        let mut ground = TerrainBitmap::blank(self.width, self.height, true);
        let height = self.height as i32;
        for x in 0..self.width as i32 {
            let top = self.surface_at(x).clamp(0, height);
            ground.fill_rect(Rect::new(x, top, 1, height - top));
        }
        ground
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid {
        what: "scene",
        reason,
    }
}

/// Parse and validate a list of scenes from a RON string.
pub fn load_scenes_from_str(ron_str: &str) -> Result<Vec<SceneConfig>, ConfigError> {
    let scenes: Vec<SceneConfig> = parse_ron("scenes", ron_str)?;
    for scene in &scenes {
        scene.validate()?;
    }
    Ok(scenes)
}

/// The suite shipped in `data/scenes.ron`.
pub fn standard_scenes() -> Result<Vec<SceneConfig>, ConfigError> {
    load_scenes_from_str(include_str!("../../../data/scenes.ron"))
}
