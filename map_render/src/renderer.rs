//! Turn renderer: world states in, map rasters out.
//!
//! Draw order per turn: background, per-player sensor rings around that
//! player's observed stars, then star glyphs on top. Glyph shape is keyed by
//! owner id block; eight palette colors by three shapes covers 24 players.

use std::path::PathBuf;

use core_recon::{StarKnowledge, TurnConsumer, WorldState};
use image::{Rgb, RgbImage};
use report_schema::{PlayerId, StarId, SCANNING_TECH};
use thiserror::Error;

use crate::config::RenderConfig;
use crate::raster;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("star {star} owner {owner} exceeds the 24-player glyph set")]
    UnsupportedOwner { star: StarId, owner: PlayerId },
    #[error("failed to write {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Circle,
    Square,
    Hexagon,
}

fn glyph_for(star: StarId, owner: PlayerId) -> Result<Glyph, RenderError> {
    match owner.0 / 8 {
        0 => Ok(Glyph::Circle),
        1 => Ok(Glyph::Square),
        2 => Ok(Glyph::Hexagon),
        _ => Err(RenderError::UnsupportedOwner { star, owner }),
    }
}

/// Renders one [`WorldState`] to an RGB raster.
pub struct MapRenderer {
    config: RenderConfig,
}

impl MapRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn render(&self, state: &WorldState) -> Result<RgbImage, RenderError> {
        let cfg = &self.config;
        let mut image = RgbImage::from_pixel(
            cfg.image_width(),
            cfg.image_height(),
            Rgb(cfg.background),
        );

        self.draw_sensor_rings(&mut image, state);
        self.draw_stars(&mut image, state)?;

        Ok(image)
    }

    /// One annulus per observed owned star, radius taken from the owner's
    /// scanning tech. Players without a scanning entry are skipped with a
    /// warning; a partial map beats no map.
    fn draw_sensor_rings(&self, image: &mut RgbImage, state: &WorldState) {
        let cfg = &self.config;
        for (id, player) in &state.players {
            let Some(scanning) = player.tech.get(SCANNING_TECH) else {
                tracing::warn!(
                    target: "starveil::render",
                    turn = state.turn,
                    player = %id,
                    "render.scanning_tech_missing"
                );
                continue;
            };
            let radius = cfg.to_screen_distance(scanning.value);
            let stroke = cfg.star_stroke();
            let color = self.owner_color(*id);
            for knowledge in state.stars.values() {
                let StarKnowledge::Observed(star) = knowledge else {
                    continue;
                };
                if star.owner != *id {
                    continue;
                }
                let (cx, cy) = cfg.to_screen(star.x, star.y);
                raster::ring(image, cx, cy, radius, stroke, color);
            }
        }
    }

    fn draw_stars(&self, image: &mut RgbImage, state: &WorldState) -> Result<(), RenderError> {
        let cfg = &self.config;
        let half = cfg.half_star_width();
        let stroke = cfg.star_stroke();
        let hatch = stroke.max(1.0) as i32;

        for (id, knowledge) in &state.stars {
            let star = knowledge.star();
            let (cx, cy) = cfg.to_screen(star.x, star.y);

            if star.owner.is_neutral() {
                raster::fill_circle(image, cx, cy, half, Rgb(cfg.neutral));
                continue;
            }

            let glyph = glyph_for(*id, star.owner)?;
            let color = self.owner_color(star.owner);

            if knowledge.is_observed() {
                match glyph {
                    Glyph::Circle => raster::ring(image, cx, cy, half, stroke, color),
                    Glyph::Square => raster::square_outline(image, cx, cy, half, stroke, color),
                    Glyph::Hexagon => raster::hexagon_outline(image, cx, cy, half, stroke, color),
                }
            } else {
                // Stale memory: hatched fill, neutral outline.
                let outline = Rgb(cfg.neutral);
                match glyph {
                    Glyph::Circle => {
                        raster::fill_circle_hatched(image, cx, cy, half, hatch, color);
                        raster::ring(image, cx, cy, half, 1.0, outline);
                    }
                    Glyph::Square => {
                        raster::fill_square_hatched(image, cx, cy, half, hatch, color);
                        raster::square_outline(image, cx, cy, half, 1.0, outline);
                    }
                    Glyph::Hexagon => {
                        raster::fill_hexagon_hatched(image, cx, cy, half, hatch, color);
                        raster::hexagon_outline(image, cx, cy, half, 1.0, outline);
                    }
                }
            }
        }
        Ok(())
    }

    fn owner_color(&self, owner: PlayerId) -> Rgb<u8> {
        let palette = &self.config.palette;
        let index = owner.0.rem_euclid(palette.len() as i32) as usize;
        Rgb(palette[index])
    }
}

/// Writes one `map_<turn>.png` per accepted world state.
pub struct PngTurnWriter {
    renderer: MapRenderer,
    out_dir: PathBuf,
}

impl PngTurnWriter {
    pub fn new(renderer: MapRenderer, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            out_dir: out_dir.into(),
        }
    }
}

impl TurnConsumer for PngTurnWriter {
    type Error = RenderError;

    fn accept(&mut self, state: &WorldState) -> Result<(), RenderError> {
        let image = self.renderer.render(state)?;
        let path = self.out_dir.join(format!("map_{}.png", state.turn));
        image.save(&path).map_err(|source| RenderError::Save {
            path: path.clone(),
            source,
        })?;
        tracing::info!(
            target: "starveil::render",
            turn = state.turn,
            path = %path.display(),
            "render.turn_written"
        );
        Ok(())
    }
}
