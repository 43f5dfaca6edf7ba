//! Layered configuration system
//!
//! Config is loaded with four layers of precedence (highest wins):
//! 1. Environment variables: `RELIEF_CAPTURE_INTERVAL`, `RELIEF_MAX_HEIGHT`,
//!    `RELIEF_CAMERA_DEVICE`, `RELIEF_FFMPEG`
//! 2. Project-local: `relief.toml`
//! 3. Global: `~/.relief/config.toml`
//! 4. Built-in defaults
//!
//! Files may be partial; tables are merged key by key before deserializing.

use crate::error::{ReliefError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound of the live max-height slider
pub const MAX_HEIGHT_LIMIT: f32 = 480.0;

/// Which end of the luminance range becomes tall terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationMode {
    /// Bright pixels are tall
    Bright,
    /// Dark pixels are tall
    #[default]
    Dark,
}

/// Filter used when resampling a frame to the terrain resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Nearest,
    #[default]
    Bilinear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Relief".to_string(),
            fov: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Width every frame is resampled to; also the room width
    pub image_width: u32,
    /// Height every frame is resampled to; also the wall height
    pub image_height: u32,
    /// Quads along the image width
    pub grid_x: u32,
    /// Quads along the image height
    pub grid_z: u32,
    /// Initial value of the max-height slider
    pub max_height: f32,
    pub elevation: ElevationMode,
    /// Colour-invert the frame before it becomes texture and height source
    pub invert_colors: bool,
    pub filter: ResampleFilter,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            grid_x: 128,
            grid_z: 96,
            max_height: 80.0,
            elevation: ElevationMode::default(),
            invert_colors: false,
            filter: ResampleFilter::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Minimum seconds between terrain regenerations; 0 regenerates every tick
    pub interval_secs: f64,
    /// Camera device handed to ffmpeg when no file is given
    pub camera_device: String,
    /// ffmpeg input format for the camera device
    pub camera_format: String,
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let (camera_format, camera_device) = if cfg!(target_os = "macos") {
            ("avfoundation", "0")
        } else if cfg!(target_os = "windows") {
            ("dshow", "video=Integrated Camera")
        } else {
            ("v4l2", "/dev/video0")
        };
        Self {
            interval_secs: 0.0,
            camera_device: camera_device.to_string(),
            camera_format: camera_format.to_string(),
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Base walking speed in world units per second
    pub speed: f32,
    pub sprint_multiplier: f32,
    /// Downward acceleration; also the flight climb rate
    pub gravity: f32,
    pub jump_impulse: f32,
    pub half_height: f32,
    /// Degrees of rotation per pixel of mouse motion
    pub mouse_sensitivity: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            speed: 80.0,
            sprint_multiplier: 2.0,
            gravity: 200.0,
            jump_impulse: 200.0,
            half_height: 10.0,
            mouse_sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub enabled: bool,
    /// Linear amplitude
    pub volume: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecalSettings {
    /// Image drawn on the floor and ceiling; a checkerboard is generated when unset
    pub texture: Option<String>,
    pub checker_tiles: u32,
    pub subdivisions: u32,
}

impl Default for DecalSettings {
    fn default() -> Self {
        Self {
            texture: None,
            checker_tiles: 8,
            subdivisions: 10,
        }
    }
}

/// Resolved configuration for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliefConfig {
    pub window: WindowConfig,
    pub terrain: TerrainSettings,
    pub capture: CaptureConfig,
    pub player: PlayerSettings,
    pub audio: AudioSettings,
    pub decal: DecalSettings,
}

impl ReliefConfig {
    /// Load config with layered precedence: defaults < global < project < env vars
    pub fn load() -> Result<Self> {
        let mut merged = toml::Table::new();

        // Layer 1: Global config (~/.relief/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                log::info!("Config: loading {}", global_path.display());
                merge_tables(&mut merged, Self::read_table(&global_path)?);
            }
        }

        // Layer 2: Project-local config (relief.toml)
        let local_path = PathBuf::from("relief.toml");
        if local_path.exists() {
            log::info!("Config: loading {}", local_path.display());
            merge_tables(&mut merged, Self::read_table(&local_path)?);
        }

        let mut config: ReliefConfig = toml::Value::Table(merged).try_into()?;

        // Layer 3: Environment variable overrides
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a specific file path only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config: ReliefConfig = toml::Value::Table(Self::read_table(path)?).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a TOML string, filling gaps with defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: ReliefConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".relief").join("config.toml"))
    }

    fn read_table(path: &Path) -> Result<toml::Table> {
        let content = std::fs::read_to_string(path)?;
        content.parse::<toml::Table>().map_err(|e| {
            ReliefError::TomlParseError(format!("{}: {}", path.display(), e))
        })
    }

    /// Apply `RELIEF_*` overrides. `lookup` abstracts the environment so tests
    /// can inject values without touching process state.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("RELIEF_CAPTURE_INTERVAL") {
            self.capture.interval_secs = parse_env("RELIEF_CAPTURE_INTERVAL", &raw)?;
        }
        if let Some(raw) = lookup("RELIEF_MAX_HEIGHT") {
            self.terrain.max_height = parse_env("RELIEF_MAX_HEIGHT", &raw)?;
        }
        if let Some(device) = lookup("RELIEF_CAMERA_DEVICE") {
            self.capture.camera_device = device;
        }
        if let Some(ffmpeg) = lookup("RELIEF_FFMPEG") {
            self.capture.ffmpeg = ffmpeg;
        }
        Ok(())
    }

    /// Reject values the rest of the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let t = &self.terrain;
        if t.image_width < 2 || t.image_height < 2 {
            return Err(ReliefError::ConfigError(format!(
                "terrain image must be at least 2x2, got {}x{}",
                t.image_width, t.image_height
            )));
        }
        if t.grid_x == 0 || t.grid_z == 0 {
            return Err(ReliefError::ConfigError(
                "terrain grid must have at least one quad per axis".into(),
            ));
        }
        if !(0.0..=MAX_HEIGHT_LIMIT).contains(&t.max_height) {
            return Err(ReliefError::ValueOutOfRange {
                field: "terrain.max_height".into(),
                min: 0.0,
                max: MAX_HEIGHT_LIMIT as f64,
                value: t.max_height as f64,
            });
        }
        if self.capture.interval_secs < 0.0 || !self.capture.interval_secs.is_finite() {
            return Err(ReliefError::ConfigError(format!(
                "capture.interval_secs must be a non-negative number, got {}",
                self.capture.interval_secs
            )));
        }
        let p = &self.player;
        if p.speed <= 0.0 || p.gravity <= 0.0 || p.sprint_multiplier <= 0.0 {
            return Err(ReliefError::ConfigError(
                "player speed, sprint_multiplier and gravity must be positive".into(),
            ));
        }
        if p.half_height < 0.0 {
            return Err(ReliefError::ConfigError(
                "player.half_height must not be negative".into(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ReliefError::ConfigError(format!("{key}: cannot parse '{raw}'")))
}

/// Recursively merge `overlay` into `base`; nested tables merge, other values replace
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
