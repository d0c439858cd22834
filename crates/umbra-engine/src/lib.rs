//! Per-level lighting and visibility state behind a single facade.
//!
//! Gameplay code registers lights and observers, mutates them as entities
//! move, and calls [`LightingEngine::tick`] once per simulation tick. The
//! renderer and automap then read light levels, tile flags, the active
//! translucency regions and the palette ramps.

mod engine;
mod error;

pub use engine::LightingEngine;
pub use error::EngineError;

pub use umbra_grid::{
    DungeonLayout, DungeonStyle, LIGHT_DARK, LIGHT_FULL, TileFlags, TileGrid, TranslucencySet,
};
pub use umbra_lighting::{LightId, MAX_LIGHT_RADIUS};
pub use umbra_palette::{LightTable, OverlayTranslations, RampMode, TranslationTable};
pub use umbra_vision::VisionId;
