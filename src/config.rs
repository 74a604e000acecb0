//! TOML configuration for a render run.
//!
//! Every section is optional; missing values fall back to the defaults below.
//!
//! ```toml
//! mode = "ray-march"
//! width = 640
//! height = 360
//! time = 1.5
//!
//! [params]
//! glow_cutoff = 40
//!
//! [camera]
//! position = [-6.0, 8.0, -10.0]
//! target = [4.0, 4.0, 4.0]
//! vertical_fov = 60.0
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;
use crate::error::RenderError;
use crate::light::DirectionalLight;
use crate::params::{RenderMode, RenderParameters};
use crate::scene::{GroundPlane, Scene};
use crate::scene_builder::SphereGrid;
use crate::skybox::GradientSky;

/// Failure to produce a usable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}", path.display())]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed fine but describes an invalid scene or parameter set.
    #[error("invalid config: {0}")]
    Invalid(#[from] RenderError),
}

/// Camera placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub vertical_fov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(-6.0, 8.0, -10.0),
            target: Vec3::new(4.0, 4.0, 4.0),
            vertical_fov: 60.0,
        }
    }
}

/// Light section. The direction does not need to be normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Direction the light travels along.
    pub direction: Vec3,
    /// Colour, each channel in [0, 1].
    pub color: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        let light = DirectionalLight::default();
        Self {
            direction: light.direction,
            color: light.color,
            intensity: light.intensity,
        }
    }
}

/// Ground plane section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Whether the y = 0 plane exists.
    pub enabled: bool,
    /// Diffuse reflectance.
    pub albedo: Vec3,
    /// Mirror reflectance.
    pub specular: Vec3,
}

impl Default for GroundConfig {
    fn default() -> Self {
        let plane = GroundPlane::default();
        Self {
            enabled: true,
            albedo: plane.albedo,
            specular: plane.specular,
        }
    }
}

/// Gradient sky section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Colour looking straight down.
    pub horizon: Vec3,
    /// Colour looking straight up.
    pub zenith: Vec3,
}

impl Default for SkyConfig {
    fn default() -> Self {
        let sky = GradientSky::default();
        Self {
            horizon: sky.horizon,
            zenith: sky.zenith,
        }
    }
}

/// Everything needed to render one frame from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Render algorithm.
    pub mode: RenderMode,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Animation time in seconds used to pose the sphere field.
    pub time: f32,
    /// Render tunables.
    pub params: RenderParameters,
    /// Camera placement.
    pub camera: CameraConfig,
    /// Directional light.
    pub light: LightConfig,
    /// Sphere grid authoring.
    pub grid: SphereGrid,
    /// Ground plane.
    pub ground: GroundConfig,
    /// Environment.
    pub sky: SkyConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            width: 800,
            height: 600,
            time: 0.0,
            params: RenderParameters::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            grid: SphereGrid::default(),
            ground: GroundConfig::default(),
            sky: SkyConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Parse TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Check the values that are not validated by the scene or camera builders.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::degenerate(
                "viewport",
                format!("dimensions must be positive, got {}x{}", self.width, self.height),
            )
            .into());
        }
        if !self.time.is_finite() {
            return Err(RenderError::degenerate("time", "must be finite").into());
        }
        self.params.validate()?;
        Ok(())
    }

    /// Spawn the sphere grid, pose it at `time` and assemble the scene.
    pub fn scene(&self) -> Result<Scene, ConfigError> {
        let field = self.grid.spawn()?;
        let light = DirectionalLight::new(self.light.direction, self.light.color, self.light.intensity)?;
        let ground = self.ground.enabled.then_some(GroundPlane {
            albedo: self.ground.albedo,
            specular: self.ground.specular,
        });
        Ok(Scene::new(field.spheres_at(self.time), ground, light)?)
    }

    /// Perspective camera matching the configured image aspect.
    pub fn camera(&self) -> Result<Camera, ConfigError> {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        Ok(Camera::look_at(
            self.camera.position,
            self.camera.target,
            Vec3::Y,
            self.camera.vertical_fov,
            aspect,
        )?)
    }

    /// Sky seen by escaping rays.
    pub fn skybox(&self) -> GradientSky {
        GradientSky {
            horizon: self.sky.horizon,
            zenith: self.sky.zenith,
        }
    }
}
