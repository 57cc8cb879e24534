use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Tuning for the whole game. Every field has a default, so the config file
/// only needs to name what it overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    #[serde(default = "default_display_width")]
    pub display_width: u32,
    #[serde(default = "default_display_height")]
    pub display_height: u32,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub bolt: BoltConfig,
    #[serde(default)]
    pub door: DoorConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_levels")]
    pub levels: Vec<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub width: f32,
    pub height: f32,
    /// Drawn size; may differ from the collision box.
    pub sprite_width: f32,
    pub sprite_height: f32,
    pub sensor_width: f32,
    pub sensor_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn_x: 50.0,
            spawn_y: 450.0,
            width: 32.0,
            height: 64.0,
            sprite_width: 32.0,
            sprite_height: 64.0,
            sensor_width: 51.0,
            sensor_height: 35.0,
        }
    }
}

/// Per-frame units: velocities are in pixels per step, accelerations in
/// pixels per step squared.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub acceleration: f32,
    pub deceleration_factor: f32,
    pub gravity: f32,
    pub x_top_speed: f32,
    pub y_top_speed: f32,
    pub jump_impulse: f32,
    pub ascent_cap: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            acceleration: 0.5,
            deceleration_factor: 3.0,
            gravity: 0.5,
            x_top_speed: 6.0,
            y_top_speed: 30.0,
            jump_impulse: 15.0,
            ascent_cap: 5.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BoltConfig {
    pub width: f32,
    pub lifetime_ms: u64,
}

impl Default for BoltConfig {
    fn default() -> Self {
        Self {
            width: 24.0,
            lifetime_ms: 350,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DoorConfig {
    pub step: f32,
    pub travel: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            step: 2.0,
            travel: 96.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub initial_shake: f32,
    pub shake_decay: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_shake: 10.0,
            shake_decay: 0.5,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            display_width: default_display_width(),
            display_height: default_display_height(),
            tile_size: default_tile_size(),
            player: PlayerConfig::default(),
            physics: PhysicsConfig::default(),
            bolt: BoltConfig::default(),
            door: DoorConfig::default(),
            camera: CameraConfig::default(),
            levels: default_levels(),
        }
    }
}

impl GameConfig {
    /// Rows of tiles that fit on screen; taller grids are bottom-aligned.
    pub fn viewport_rows(&self) -> usize {
        (self.display_height as f32 / self.tile_size) as usize
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GameConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Like [`load_config_from_path`], but a missing file means "use defaults".
pub fn load_config_or_default(path: &Path) -> Result<GameConfig, ConfigError> {
    if !path.exists() {
        log::warn!(
            "Config '{}' not found, using built-in defaults",
            path.display()
        );
        return Ok(GameConfig::default());
    }
    load_config_from_path(path)
}

fn validate_config(config: &GameConfig) -> Result<(), ConfigError> {
    if config.display_width == 0 || config.display_height == 0 {
        return Err(ConfigError::Invalid(
            "display dimensions must be > 0".to_string(),
        ));
    }
    if config.tile_size <= 0.0 {
        return Err(ConfigError::Invalid("tile_size must be > 0".to_string()));
    }
    if config.player.width <= 0.0 || config.player.height <= 0.0 {
        return Err(ConfigError::Invalid(
            "player dimensions must be > 0".to_string(),
        ));
    }
    let physics = &config.physics;
    if physics.acceleration <= 0.0 || physics.x_top_speed <= 0.0 || physics.y_top_speed <= 0.0 {
        return Err(ConfigError::Invalid(
            "acceleration and top speeds must be > 0".to_string(),
        ));
    }
    if config.door.step <= 0.0 || config.door.travel < 0.0 {
        return Err(ConfigError::Invalid(
            "door step must be > 0 and travel >= 0".to_string(),
        ));
    }
    if config.levels.is_empty() {
        return Err(ConfigError::Invalid("levels list is empty".to_string()));
    }
    Ok(())
}

const fn default_display_width() -> u32 {
    800
}

const fn default_display_height() -> u32 {
    640
}

const fn default_tile_size() -> f32 {
    32.0
}

fn default_levels() -> Vec<PathBuf> {
    ["level_1", "level_2", "level_3"]
        .iter()
        .map(|id| PathBuf::from(format!("assets/levels/{id}.json")))
        .collect()
}
