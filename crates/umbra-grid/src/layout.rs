//! Static dungeon geometry supplied by the level generator.
//!
//! The lighting and vision crates only need two facts per tile: whether it
//! blocks line of sight, and which translucency region (if any) it belongs
//! to. Region `0` means "no region".

use crate::grid::{GridError, TileGrid};

/// Opacity and translucency-region classification for every tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DungeonLayout {
    opaque: TileGrid<bool>,
    regions: TileGrid<u8>,
}

impl DungeonLayout {
    /// Creates a fully open layout with no translucency regions.
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            opaque: TileGrid::new(width, height, false),
            regions: TileGrid::new(width, height, 0),
        }
    }

    /// Builds a layout from generator output. Both grids must share dimensions.
    pub fn from_grids(opaque: TileGrid<bool>, regions: TileGrid<u8>) -> Result<Self, GridError> {
        if opaque.size() != regions.size() {
            return Err(GridError::DimensionMismatch(opaque.size(), regions.size()));
        }
        Ok(Self { opaque, regions })
    }

    /// Parses a text map: `#` is an opaque tile, `1`-`9` are open tiles in the
    /// given translucency region, anything else is open floor.
    ///
    /// Every line must have the same length.
    pub fn from_ascii(text: &str) -> Result<Self, GridError> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.trim().chars().count());
        let mut opaque = Vec::with_capacity(width * height);
        let mut regions = Vec::with_capacity(width * height);
        for row in &rows {
            let row = row.trim();
            let len = row.chars().count();
            if len != width {
                return Err(GridError::SizeMismatch {
                    width,
                    height,
                    expected: width * height,
                    actual: len * height,
                });
            }
            for c in row.chars() {
                opaque.push(c == '#');
                regions.push(c.to_digit(10).map_or(0, |d| d as u8));
            }
        }
        Self::from_grids(
            TileGrid::from_vec(width, height, opaque)?,
            TileGrid::from_vec(width, height, regions)?,
        )
    }

    /// Width in tiles.
    pub fn width(&self) -> usize {
        self.opaque.width()
    }

    /// Height in tiles.
    pub fn height(&self) -> usize {
        self.opaque.height()
    }

    /// `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        self.opaque.size()
    }

    /// Returns `true` if `(x, y)` lies on the map.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.opaque.contains(x, y)
    }

    /// Returns `true` if the tile blocks line of sight. Off-map tiles are opaque.
    pub fn is_opaque(&self, x: i32, y: i32) -> bool {
        self.opaque.get(x, y).unwrap_or(true)
    }

    /// Marks a tile as blocking or clear.
    pub fn set_opaque(&mut self, x: i32, y: i32, opaque: bool) {
        self.opaque.set(x, y, opaque);
    }

    /// Translucency region of a tile (`0` = none, also for off-map tiles).
    pub fn region(&self, x: i32, y: i32) -> u8 {
        self.regions.get(x, y).unwrap_or(0)
    }

    /// Assigns a tile to a translucency region.
    pub fn set_region(&mut self, x: i32, y: i32, region: u8) {
        self.regions.set(x, y, region);
    }
}

/// Translucency regions activated by the current vision pass.
///
/// The renderer alpha-blends walls belonging to an active region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslucencySet {
    active: [bool; 256],
}

impl TranslucencySet {
    /// Creates a set with every region inactive.
    pub fn new() -> Self {
        Self {
            active: [false; 256],
        }
    }

    /// Deactivates every region.
    pub fn clear(&mut self) {
        self.active = [false; 256];
    }

    /// Activates `region`. Region `0` is ignored.
    pub fn activate(&mut self, region: u8) {
        if region != 0 {
            self.active[region as usize] = true;
        }
    }

    /// Returns `true` if `region` is active this frame.
    pub fn is_active(&self, region: u8) -> bool {
        self.active[region as usize]
    }

    /// Iterates over the active region ids in ascending order.
    pub fn active_regions(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=u8::MAX).filter(|&r| self.active[r as usize])
    }
}

impl Default for TranslucencySet {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ascii_parses_walls_and_regions() {
        let layout = DungeonLayout::from_ascii(
            "
            #####
            #.2.#
            #####
            ",
        )
        .unwrap();
        assert_eq!(layout.size(), (5, 3));
        assert!(layout.is_opaque(0, 0));
        assert!(!layout.is_opaque(1, 1));
        assert_eq!(layout.region(2, 1), 2);
        assert_eq!(layout.region(1, 1), 0);
    }

    #[test]
    fn test_from_ascii_rejects_ragged_rows() {
        assert!(DungeonLayout::from_ascii("###\n##\n").is_err());
    }

    #[test]
    fn test_from_ascii_counts_characters_not_bytes() {
        let layout = DungeonLayout::from_ascii("#·#\n·1·\n").unwrap();
        assert_eq!(layout.size(), (3, 2));
        assert!(layout.is_opaque(0, 0));
        assert!(!layout.is_opaque(1, 0));
        assert_eq!(layout.region(1, 1), 1);
        assert!(DungeonLayout::from_ascii("#·#\n·#\n").is_err());
    }

    #[test]
    fn test_off_map_is_opaque() {
        let layout = DungeonLayout::open(4, 4);
        assert!(!layout.is_opaque(3, 3));
        assert!(layout.is_opaque(4, 3));
        assert!(layout.is_opaque(-1, 0));
    }

    #[test]
    fn test_from_grids_checks_dimensions() {
        let result = DungeonLayout::from_grids(TileGrid::new(4, 4, false), TileGrid::new(4, 5, 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_translucency_ignores_region_zero() {
        let mut set = TranslucencySet::new();
        set.activate(0);
        set.activate(7);
        assert!(!set.is_active(0));
        assert!(set.is_active(7));
        assert_eq!(set.active_regions().collect::<Vec<_>>(), vec![7]);
        set.clear();
        assert_eq!(set.active_regions().count(), 0);
    }
}
