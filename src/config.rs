//! Render configuration loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable config files.
//! Every field is optional; missing ones take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RasterError;
use crate::rasterizer::{Color, RasterSettings, HEIGHT, WIDTH};

/// Top-level render configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Framebuffer width in pixels
    pub width: usize,
    /// Framebuffer height in pixels
    pub height: usize,
    /// Color the framebuffer is cleared to each frame
    pub clear_color: Color,
    /// Lighting and viewport options
    pub raster: RasterSettings,
    /// Texture image; a checkerboard is used when absent
    pub texture: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            clear_color: Color::BLACK,
            raster: RasterSettings::default(),
            texture: None,
        }
    }
}

impl RenderConfig {
    /// Reject values the pipeline cannot use
    pub fn validate(&self) -> Result<(), RasterError> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::InvalidConfig(format!(
                "framebuffer size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        // Presentation uploads the frame as a texture with u16 dimensions
        if self.width > u16::MAX as usize || self.height > u16::MAX as usize {
            return Err(RasterError::InvalidConfig(format!(
                "framebuffer size must be at most {}x{}, got {}x{}",
                u16::MAX,
                u16::MAX,
                self.width,
                self.height
            )));
        }
        if self.raster.light_dir.len() == 0.0 {
            return Err(RasterError::InvalidConfig("light_dir must not be zero".to_string()));
        }
        Ok(())
    }
}

/// Parse a config from a RON string
pub fn parse_config(s: &str) -> Result<RenderConfig, RasterError> {
    let config: RenderConfig = ron::from_str(s)?;
    config.validate()?;
    Ok(config)
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, RasterError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    log::info!(
        "Loaded config {} ({}x{}, origin {:?})",
        path.display(),
        config.width,
        config.height,
        config.raster.origin
    );
    Ok(config)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), RasterError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("    ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}
