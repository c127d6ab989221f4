use std::path::{Path, PathBuf};
use std::{fs, io};

use glam::Vec3;
use serde::Deserialize;

use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "VOXEL_SANDBOX_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "sandbox.toml";

const MAX_EXTENT: u32 = 64;
const MIN_FOV: f32 = 20.0;
const MAX_FOV: f32 = 120.0;
const MIN_TICK_RATE: u32 = 1;
const MAX_TICK_RATE: u32 = 240;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub world: WorldSettings,
    pub movement: MovementSettings,
    pub camera: CameraSettings,
    /// Frames per second; movement constants are per frame.
    pub tick_rate: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            world: WorldSettings::default(),
            movement: MovementSettings::default(),
            camera: CameraSettings::default(),
            tick_rate: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Voxel Sandbox".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub extent_x: u32,
    pub extent_z: u32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            extent_x: 5,
            extent_z: 5,
        }
    }
}

/// Per-frame units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    pub speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    /// Lowest eye height; block height 1 plus player height.
    pub ground_height: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            speed: 0.1,
            gravity: 0.04,
            jump_impulse: 0.7,
            ground_height: 2.0,
        }
    }
}

impl MovementSettings {
    /// Rates must be finite and non-negative; the ground height only finite.
    /// Anything else falls back to its default.
    fn sanitize(self) -> Self {
        let d = Self::default();
        let rate = |v: f32, fallback: f32| if v.is_finite() && v >= 0.0 { v } else { fallback };
        Self {
            speed: rate(self.speed, d.speed),
            gravity: rate(self.gravity, d.gravity),
            jump_impulse: rate(self.jump_impulse, d.jump_impulse),
            ground_height: if self.ground_height.is_finite() {
                self.ground_height
            } else {
                d.ground_height
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub start_position: Vec3,
    pub look_at: Vec3,
    pub mouse_sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 20000.0,
            start_position: Vec3::new(0.0, 6.0, 10.0),
            look_at: Vec3::ZERO,
            mouse_sensitivity: 0.002,
        }
    }
}

impl Settings {
    pub fn sanitize(mut self) -> Self {
        self.world.extent_x = self.world.extent_x.min(MAX_EXTENT);
        self.world.extent_z = self.world.extent_z.min(MAX_EXTENT);
        self.camera.fov_y_degrees = self.camera.fov_y_degrees.clamp(MIN_FOV, MAX_FOV);
        self.camera.near = self.camera.near.max(1e-3);
        self.camera.far = self.camera.far.max(self.camera.near + 1.0);
        self.window.width = self.window.width.max(1);
        self.window.height = self.window.height.max(1);
        self.tick_rate = self.tick_rate.clamp(MIN_TICK_RATE, MAX_TICK_RATE);
        self.movement = self.movement.sanitize();
        self
    }

    pub fn from_toml(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let parsed = toml::from_str::<Self>(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(parsed.sanitize())
    }

    /// A missing file is not an error; defaults are used instead.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml(path, &contents).map(Some)
    }

    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}
