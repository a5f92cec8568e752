//! Presentation parameters for the rendered map.
//!
//! Loaded from `render_config.json`; every field has an observed default so a
//! partial file only overrides what it names.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

/// World window, output sizing, glyph sizing, and the player palette.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    /// Output image height in pixels; width follows the aspect ratio.
    pub scale: f64,
    /// Star glyph diameter in pixels.
    pub star_width: f64,
    /// Owner colors, cycled by `owner % len`.
    pub palette: Vec<[u8; 3]>,
    /// Neutral stars and remembered-star outlines.
    pub neutral: [u8; 3],
    pub background: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_x: -5.0,
            min_y: -5.0,
            max_x: 5.0,
            max_y: 5.0,
            scale: 1000.0,
            star_width: 10.0,
            palette: vec![
                [0, 0, 255],     // blue
                [0, 255, 255],   // cyan
                [0, 128, 0],     // green
                [255, 215, 0],   // gold
                [255, 140, 0],   // dark orange
                [255, 0, 0],     // red
                [255, 20, 147],  // deep pink
                [128, 0, 128],   // purple
            ],
            neutral: [255, 255, 255],
            background: [0, 0, 0],
        }
    }
}

impl RenderConfig {
    pub fn range_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn range_y(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.range_x() / self.range_y()
    }

    pub fn image_width(&self) -> u32 {
        (self.scale * self.aspect_ratio()) as u32
    }

    pub fn image_height(&self) -> u32 {
        self.scale as u32
    }

    pub fn star_stroke(&self) -> f64 {
        self.star_width / 3.0
    }

    pub fn half_star_width(&self) -> f64 {
        self.star_width / 2.0
    }

    /// Project a world position into pixel coordinates.
    pub fn to_screen(&self, x: f64, y: f64) -> (i32, i32) {
        let sx = ((x - self.min_x) / self.range_x()) * f64::from(self.image_width());
        let sy = ((y - self.min_y) / self.range_y()) * f64::from(self.image_height());
        (sx as i32, sy as i32)
    }

    /// Project a world distance onto the horizontal pixel axis.
    pub fn to_screen_distance(&self, distance: f64) -> f64 {
        (distance / self.range_x()) * f64::from(self.image_width())
    }

    pub fn from_json_str(json: &str) -> Result<Self, RenderConfigError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        if config.palette.is_empty() {
            return Err(RenderConfigError::EmptyPalette);
        }
        if config.range_x() <= 0.0 || config.range_y() <= 0.0 || config.scale <= 0.0 {
            return Err(RenderConfigError::DegenerateWindow);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, RenderConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| RenderConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}

#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("failed to parse render config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read render config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("world window and scale must be positive")]
    DegenerateWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_square_kilopixel() {
        let config = RenderConfig::default();
        assert_eq!(config.image_width(), 1000);
        assert_eq!(config.image_height(), 1000);
        assert_eq!(config.palette.len(), 8);
    }

    #[test]
    fn world_corners_map_to_image_corners() {
        let config = RenderConfig::default();
        assert_eq!(config.to_screen(-5.0, -5.0), (0, 0));
        assert_eq!(config.to_screen(5.0, 5.0), (1000, 1000));
        assert_eq!(config.to_screen(0.0, 0.0), (500, 500));
    }

    #[test]
    fn distances_scale_with_the_horizontal_axis() {
        let config = RenderConfig::default();
        assert!((config.to_screen_distance(1.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn partial_config_overrides_selectively() {
        let config = RenderConfig::from_json_str(r#"{ "scale": 500.0 }"#)
            .expect("partial config should parse");
        assert_eq!(config.image_height(), 500);
        assert_eq!(config.star_width, 10.0);
    }

    #[test]
    fn empty_palette_is_rejected() {
        let err = RenderConfig::from_json_str(r#"{ "palette": [] }"#)
            .expect_err("empty palette must be rejected");
        assert!(matches!(err, RenderConfigError::EmptyPalette));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = RenderConfig::from_json_str(r#"{ "min_x": 5.0, "max_x": -5.0 }"#)
            .expect_err("inverted window must be rejected");
        assert!(matches!(err, RenderConfigError::DegenerateWindow));
    }
}
