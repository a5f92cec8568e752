//! Raster map rendering for reconstructed world states.
//!
//! Consumes the engine's per-turn [`core_recon::WorldState`] records and
//! produces one map image per turn: background, per-player sensor rings, and
//! star glyphs, with remembered stars styled distinctly from observed ones.

mod config;
mod raster;
mod renderer;

pub use config::{RenderConfig, RenderConfigError};
pub use renderer::{MapRenderer, PngTurnWriter, RenderError};
