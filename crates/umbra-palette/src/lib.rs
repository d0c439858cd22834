//! Brightness ramps for an indexed 256-colour palette.
//!
//! A ramp maps every palette index to the index that represents the same
//! colour at a given light level. The renderer picks a ramp per tile from
//! the tile's light level and remaps sprite pixels through it.

pub mod ramp;
pub mod translation;

pub use ramp::{LightTable, RAMP_LEN, RampMode};
pub use translation::{OverlayTranslations, PaletteError, TranslationTable};
