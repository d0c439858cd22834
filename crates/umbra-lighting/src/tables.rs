//! Precomputed falloff and distance tables.
//!
//! Distances are measured in eighths of a tile ("buckets") so that a light's
//! sub-tile offset can be folded into a single integer lookup. Both tables
//! are built once per level and never mutated afterwards.

use umbra_grid::{DungeonStyle, LIGHT_DARK};

/// Largest supported light radius in tiles.
pub const MAX_LIGHT_RADIUS: u8 = 15;

/// Number of distinct radii (`0..=MAX_LIGHT_RADIUS`).
pub const RADIUS_COUNT: usize = MAX_LIGHT_RADIUS as usize + 1;

/// Number of distance buckets in the attenuation table. Larger distances are unlit.
pub const DISTANCE_BUCKETS: usize = 128;

/// Sub-tile resolution: one tile spans this many distance buckets.
pub const SUBTILE: i32 = 8;

/// Side length of the block table's local window in tiles.
pub const WINDOW: usize = 16;

/// Maps `(radius, distance bucket)` to a light level (`0` brightest, `15` dark).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttenuationTable {
    levels: [[u8; DISTANCE_BUCKETS]; RADIUS_COUNT],
    reach: [i32; RADIUS_COUNT],
}

impl AttenuationTable {
    /// Builds the falloff curve for `style`.
    ///
    /// Classic styles fall off linearly to darkness one tile past the radius.
    /// Expansion styles use a squared curve that never fully darkens for
    /// large radii.
    pub fn new(style: DungeonStyle) -> Self {
        let mut levels = [[LIGHT_DARK; DISTANCE_BUCKETS]; RADIUS_COUNT];
        for (radius, row) in levels.iter_mut().enumerate() {
            for (bucket, level) in row.iter_mut().enumerate() {
                *level = if style.is_expansion() {
                    squared_falloff(radius as i32, bucket as i32)
                } else {
                    linear_falloff(radius as i32, bucket as i32)
                };
            }
        }

        let mut reach = [1; RADIUS_COUNT];
        for (radius, row) in levels.iter().enumerate() {
            if let Some(last_lit) = row.iter().rposition(|&l| l < LIGHT_DARK) {
                // A tile `n` steps away is at least `8n - 7` buckets from the source.
                let tiles = (last_lit as i32 + SUBTILE - 1) / SUBTILE;
                reach[radius] = (tiles + 1).min(WINDOW as i32 - 1);
            }
        }

        Self { levels, reach }
    }

    /// Light level at `bucket` eighths of a tile from a source of `radius`.
    ///
    /// Radii above [`MAX_LIGHT_RADIUS`] are clamped; buckets past the table are dark.
    pub fn level(&self, radius: u8, bucket: u8) -> u8 {
        let radius = radius.min(MAX_LIGHT_RADIUS) as usize;
        self.levels[radius]
            .get(bucket as usize)
            .copied()
            .unwrap_or(LIGHT_DARK)
    }

    /// Exclusive bound on the tile distance (per axis) a source of `radius`
    /// can brighten. Never exceeds the block table window.
    pub fn reach(&self, radius: u8) -> i32 {
        self.reach[radius.min(MAX_LIGHT_RADIUS) as usize]
    }
}

fn linear_falloff(radius: i32, bucket: i32) -> u8 {
    let span = SUBTILE * (radius + 1);
    if bucket > span {
        return LIGHT_DARK;
    }
    // round(15 * bucket / span)
    ((2 * LIGHT_DARK as i32 * bucket + span) / (2 * span)) as u8
}

fn squared_falloff(radius: i32, bucket: i32) -> u8 {
    let far = DISTANCE_BUCKETS as i32 - bucket;
    let glow = (radius + 1) * far * far / (DISTANCE_BUCKETS as i32 * DISTANCE_BUCKETS as i32);
    let level = (LIGHT_DARK as i32 - glow).max(0);
    (level - radius / 2).max(0) as u8
}

/// Maps `(sub-tile offset, local row, local column)` to the distance bucket
/// between a light at that offset and the tile at `(column, row)`.
///
/// Only one quadrant is stored; the propagation pass rotates the offset to
/// reuse it for the other three.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockTable {
    buckets: Box<[[[u8; WINDOW]; WINDOW]; (SUBTILE * SUBTILE) as usize]>,
}

impl BlockTable {
    /// Builds the table from Euclidean distance, truncated to whole buckets.
    pub fn new() -> Self {
        let mut buckets = Box::new([[[0u8; WINDOW]; WINDOW]; (SUBTILE * SUBTILE) as usize]);
        for oy in 0..SUBTILE {
            for ox in 0..SUBTILE {
                let block = &mut buckets[(ox + SUBTILE * oy) as usize];
                for (row, cells) in block.iter_mut().enumerate() {
                    for (col, cell) in cells.iter_mut().enumerate() {
                        let dx = f64::from(SUBTILE * col as i32 - ox);
                        let dy = f64::from(SUBTILE * row as i32 - oy);
                        *cell = (dx * dx + dy * dy).sqrt() as u8;
                    }
                }
            }
        }
        Self { buckets }
    }

    /// Distance bucket for offset `(ox, oy)` in `0..8` and local `(col, row)`
    /// in `0..16`.
    pub fn bucket(&self, ox: i32, oy: i32, col: i32, row: i32) -> u8 {
        self.buckets[(ox + SUBTILE * oy) as usize][row as usize][col as usize]
    }
}

impl Default for BlockTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Both lookup tables plus the style they were built for.
#[derive(Clone, Debug)]
pub struct LightTables {
    /// Falloff curve.
    pub attenuation: AttenuationTable,
    /// Quadrant distance table.
    pub block: BlockTable,
    /// Style the attenuation curve was built for.
    pub style: DungeonStyle,
}

impl LightTables {
    /// Builds both tables for `style`.
    pub fn new(style: DungeonStyle) -> Self {
        tracing::debug!(%style, "building light tables");
        Self {
            attenuation: AttenuationTable::new(style),
            block: BlockTable::new(),
            style,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
