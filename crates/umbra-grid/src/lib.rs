//! Tile grids, per-tile flags, dungeon styles, and the static dungeon layout
//! consumed by the lighting and vision crates.

pub mod flags;
pub mod grid;
pub mod layout;
pub mod style;

pub use flags::TileFlags;
pub use grid::{GridError, TileGrid};
pub use layout::{DungeonLayout, TranslucencySet};
pub use style::{DungeonStyle, ParseStyleError};

/// Brightest light level.
pub const LIGHT_FULL: u8 = 0;

/// Darkest light level (unlit).
pub const LIGHT_DARK: u8 = 15;

/// Default dungeon width and height in tiles.
pub const DEFAULT_MAP_SIZE: usize = 112;
