//! Game Configuration
//!
//! Everything the host shell decides before the first scene starts:
//! renderer mode, canvas size, scene order, physics, colors, mount point and
//! asset locations. Loaded from TOML; every field has a default.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::core::draw::Color;
use crate::game::SceneKey;

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "starfall.toml";

/// Environment variable overriding the config path.
pub const CONFIG_ENV_VAR: &str = "STARFALL_CONFIG";

/// Where the published star and sand images live.
pub const DEFAULT_ASSET_BASE_URL: &str =
    "https://raw.githubusercontent.com/mariyadavydova/starfall-phaser3-typescript/master/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// Sections
// ============================================================================

/// Which GPU backend(s) to ask wgpu for.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RendererMode {
    #[default]
    Auto,
    WebGpu,
    WebGl,
    Vulkan,
    Metal,
    Dx12,
}

impl RendererMode {
    pub fn backends(self) -> wgpu::Backends {
        match self {
            RendererMode::Auto => wgpu::Backends::all(),
            RendererMode::WebGpu => wgpu::Backends::BROWSER_WEBGPU,
            RendererMode::WebGl => wgpu::Backends::GL,
            RendererMode::Vulkan => wgpu::Backends::VULKAN,
            RendererMode::Metal => wgpu::Backends::METAL,
            RendererMode::Dx12 => wgpu::Backends::DX12,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PhysicsEngine {
    #[default]
    Arcade,
}

/// Plain 2D vector as it appears in TOML (`{ x = 0.0, y = 100.0 }`).
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl From<Vector> for Vec2 {
    fn from(v: Vector) -> Self {
        Vec2::new(v.x, v.y)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub default: PhysicsEngine,
    pub gravity: Vector,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            default: PhysicsEngine::Arcade,
            gravity: Vector { x: 0.0, y: 100.0 },
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Prefix joined with each asset's relative path.
    pub base_url: String,
    /// Local directory checked before the network; fetched files are cached here.
    pub local_dir: PathBuf,
    pub fetch_remote: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            local_dir: PathBuf::from("."),
            fetch_remote: true,
        }
    }
}

impl AssetConfig {
    /// Never touches disk or network; every image becomes a placeholder.
    pub fn offline() -> Self {
        Self {
            base_url: String::new(),
            local_dir: PathBuf::new(),
            fetch_remote: false,
        }
    }
}

// ============================================================================
// Game Config
// ============================================================================

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub renderer: RendererMode,
    pub width: u32,
    pub height: u32,
    /// DOM element id the canvas is appended to (wasm only).
    pub parent: String,
    pub background_color: String,
    /// Registered scenes; the first one starts at boot.
    pub scenes: Vec<SceneKey>,
    pub physics: PhysicsConfig,
    pub assets: AssetConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            renderer: RendererMode::Auto,
            width: 800,
            height: 600,
            parent: "gameContainer".to_string(),
            background_color: "#000033".to_string(),
            scenes: vec![SceneKey::Welcome, SceneKey::Play, SceneKey::Score],
            physics: PhysicsConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl GameConfig {
    /// Loads config from `$STARFALL_CONFIG`, else `starfall.toml`, else defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    log::info!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// The browser build has no filesystem to read from.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        for key in SceneKey::ALL {
            let count = self.scenes.iter().filter(|k| **k == key).count();
            if count != 1 {
                return Err(ConfigError::Invalid(format!(
                    "scene '{}' must be registered exactly once, found {}",
                    key.name(),
                    count
                )));
            }
        }
        if Color::parse_hex(&self.background_color).is_none() {
            return Err(ConfigError::Invalid(format!(
                "background_color must look like #rrggbb, got '{}'",
                self.background_color
            )));
        }
        Ok(())
    }

    /// Validated background color; falls back to black on a bad string.
    pub fn background(&self) -> Color {
        Color::parse_hex(&self.background_color).unwrap_or(Color::from_rgb_hex(0x000000))
    }

    /// Game-space extent in pixels.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}
