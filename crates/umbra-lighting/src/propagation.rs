//! Applying and undoing a single light source on the tile light grid.
//!
//! A source lights its own tile and four quadrant windows around it. Each
//! quadrant reads the same single-quadrant [`BlockTable`](crate::BlockTable):
//! between passes the sub-tile offset is rotated by a quarter turn so the
//! table lookup sees the quadrant as if it were the first one.

use umbra_grid::{LIGHT_DARK, LIGHT_FULL, TileGrid};

use crate::tables::{DISTANCE_BUCKETS, LightTables, MAX_LIGHT_RADIUS, SUBTILE};

/// Base and working light levels for every tile.
///
/// `base` holds static level light computed at load time; `working` is what
/// the renderer reads. Undoing a source restores `working` from `base`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightGrid {
    /// Static light from pre-placed sources.
    pub base: TileGrid<u8>,
    /// Base light plus every live dynamic source.
    pub working: TileGrid<u8>,
}

impl LightGrid {
    /// Creates a grid where both layers hold `level` everywhere.
    pub fn new(width: usize, height: usize, level: u8) -> Self {
        let base = TileGrid::new(width, height, level);
        Self {
            working: base.clone(),
            base,
        }
    }

    /// Creates a grid from generator-supplied base light.
    pub fn from_base(base: TileGrid<u8>) -> Self {
        Self {
            working: base.clone(),
            base,
        }
    }

    /// Working light level at `(x, y)`; off-map tiles are dark.
    pub fn level(&self, x: i32, y: i32) -> u8 {
        self.working.get(x, y).unwrap_or(LIGHT_DARK)
    }

    /// Copies the working layer into the base layer, making everything lit so
    /// far part of the static light.
    pub fn save_pre_lighting(&mut self) {
        self.base.clone_from(&self.working);
    }

    /// Discards all dynamic light.
    pub fn restore_base(&mut self) {
        self.working.clone_from(&self.base);
    }
}

/// Quarter-turn rotation state for the sub-tile offset.
///
/// `light` tracks where the table's origin moved to; the difference between
/// the rotated offset and it is the offset seen by the next quadrant. A
/// negative component borrows one row or column of the table.
struct QuadrantFrame {
    offset: (i32, i32),
    light: (i32, i32),
}

impl QuadrantFrame {
    fn new(ox: i32, oy: i32) -> Self {
        Self {
            offset: (ox, oy),
            light: (0, 0),
        }
    }

    /// Rotates to the next quadrant; returns `(table offset, table borrow)`.
    fn rotate(&mut self) -> ((i32, i32), (i32, i32)) {
        let last = SUBTILE - 1;
        self.offset = (last - self.offset.1, self.offset.0);
        self.light = (last - self.light.1, self.light.0);

        let mut x = self.offset.0 - self.light.0;
        let mut y = self.offset.1 - self.light.1;
        let mut borrow = (0, 0);
        if x < 0 {
            x += SUBTILE;
            borrow.0 = 1;
        }
        if y < 0 {
            y += SUBTILE;
            borrow.1 = 1;
        }
        ((x, y), borrow)
    }
}

/// Maps a quadrant-local `(col, row)` to a map tile for `pass` (0..4).
///
/// `None` when the tile lies outside the `i32` coordinate space.
fn quadrant_tile(pass: usize, x: i64, y: i64, col: i32, row: i32) -> Option<(i32, i32)> {
    let (col, row) = (i64::from(col), i64::from(row));
    let (mx, my) = match pass {
        0 => (x + col, y + row),
        1 => (x + row, y - col),
        2 => (x - col, y - row),
        _ => (x - row, y + col),
    };
    Some((i32::try_from(mx).ok()?, i32::try_from(my).ok()?))
}

/// Brightens `target` with a source at tile `(x, y)`, sub-tile `offset` in
/// eighths (`-7..=7` per axis) and `radius`.
///
/// Every tile keeps the brighter of its current level and the source's level.
/// Off-map tiles are skipped.
pub fn apply_light(
    target: &mut TileGrid<u8>,
    tables: &LightTables,
    x: i32,
    y: i32,
    offset: (i8, i8),
    radius: u8,
) {
    let radius = radius.min(MAX_LIGHT_RADIUS);
    let (mut x, mut y) = (i64::from(x), i64::from(y));
    let mut ox = i32::from(offset.0).clamp(-(SUBTILE - 1), SUBTILE - 1);
    let mut oy = i32::from(offset.1).clamp(-(SUBTILE - 1), SUBTILE - 1);
    if ox < 0 {
        ox += SUBTILE;
        x -= 1;
    }
    if oy < 0 {
        oy += SUBTILE;
        y -= 1;
    }

    if let Some(cell) = quadrant_tile(0, x, y, 0, 0).and_then(|(x, y)| target.get_mut(x, y)) {
        if tables.style.is_expansion() {
            *cell = (*cell).min(tables.attenuation.level(radius, 0));
        } else {
            *cell = LIGHT_FULL;
        }
    }

    let reach = tables.attenuation.reach(radius);
    let mut frame = QuadrantFrame::new(ox, oy);
    for pass in 0..4 {
        let ((tx, ty), (bx, by)) = if pass == 0 {
            ((ox, oy), (0, 0))
        } else {
            frame.rotate()
        };
        for row in 0..reach {
            for col in 1..reach {
                let bucket = tables.block.bucket(tx, ty, col + bx, row + by);
                if bucket as usize >= DISTANCE_BUCKETS {
                    continue;
                }
                let level = tables.attenuation.level(radius, bucket);
                if let Some(cell) =
                    quadrant_tile(pass, x, y, col, row).and_then(|(mx, my)| target.get_mut(mx, my))
                    && level < *cell
                {
                    *cell = level;
                }
            }
        }
    }
}

/// Undoes any source of `radius` centred near `(x, y)` by restoring working
/// light from the base layer.
///
/// The restored square is at least `radius + 1` tiles in every direction and
/// always covers the source's full reach, including a one-tile shift from a
/// negative sub-tile offset.
pub fn unlight(grid: &mut LightGrid, tables: &LightTables, x: i32, y: i32, radius: u8) {
    let radius = radius.min(MAX_LIGHT_RADIUS);
    let half = (i32::from(radius) + 1).max(tables.attenuation.reach(radius));
    grid.working.copy_square_from(&grid.base, x, y, half);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_grid::DungeonStyle;

    fn dark_grid(size: usize) -> LightGrid {
        LightGrid::new(size, size, LIGHT_DARK)
    }

    fn lit(
        tables: &LightTables,
        size: usize,
        x: i32,
        y: i32,
        offset: (i8, i8),
        r: u8,
    ) -> TileGrid<u8> {
        let mut grid = TileGrid::new(size, size, LIGHT_DARK);
        apply_light(&mut grid, tables, x, y, offset, r);
        grid
    }

    #[test]
    fn test_source_tile_is_full_bright_on_classic_styles() {
        let tables = LightTables::new(DungeonStyle::Cathedral);
        let grid = lit(&tables, 40, 20, 20, (0, 0), 0);
        assert_eq!(grid.get(20, 20), Some(LIGHT_FULL));
    }

    #[test]
    fn test_source_tile_uses_falloff_on_expansion_styles() {
        let tables = LightTables::new(DungeonStyle::Nest);
        let grid = lit(&tables, 40, 20, 20, (0, 0), 0);
        assert_eq!(grid.get(20, 20), Some(tables.attenuation.level(0, 0)));
        assert_ne!(grid.get(20, 20), Some(LIGHT_FULL));
    }

    #[test]
    fn test_zero_offset_light_is_eightfold_symmetric() {
        let tables = LightTables::new(DungeonStyle::Catacombs);
        let grid = lit(&tables, 48, 24, 24, (0, 0), 7);
        for a in -12..=12 {
            for b in -12..=12 {
                let here = grid.get(24 + a, 24 + b);
                assert_eq!(here, grid.get(24 - a, 24 + b), "mirror x at ({a}, {b})");
                assert_eq!(here, grid.get(24 + a, 24 - b), "mirror y at ({a}, {b})");
                assert_eq!(here, grid.get(24 + b, 24 + a), "transpose at ({a}, {b})");
            }
        }
    }

    #[test]
    fn test_light_matches_table_along_axis() {
        let tables = LightTables::new(DungeonStyle::Cathedral);
        let grid = lit(&tables, 40, 20, 20, (0, 0), 4);
        for d in 1..8 {
            let expected = tables.attenuation.level(4, (8 * d) as u8);
            assert_eq!(grid.get(20 + d, 20), Some(expected), "east {d}");
            assert_eq!(grid.get(20, 20 - d), Some(expected), "north {d}");
            assert_eq!(grid.get(20 - d, 20), Some(expected), "west {d}");
            assert_eq!(grid.get(20, 20 + d), Some(expected), "south {d}");
        }
    }

    #[test]
    fn test_positive_offset_shifts_light_forward() {
        let tables = LightTables::new(DungeonStyle::Cathedral);
        let centred = lit(&tables, 40, 20, 20, (0, 0), 3);
        let shifted = lit(&tables, 40, 20, 20, (4, 0), 3);
        assert!(shifted.get(22, 20) < centred.get(22, 20));
        assert!(shifted.get(18, 20) > centred.get(18, 20));
    }

    #[test]
    fn test_negative_offset_borrows_previous_tile() {
        let tables = LightTables::new(DungeonStyle::Caves);
        let negative = lit(&tables, 40, 20, 20, (-4, -3), 6);
        let explicit = lit(&tables, 40, 19, 19, (4, 5), 6);
        assert_eq!(negative, explicit);
    }

    #[test]
    fn test_brightest_source_wins() {
        let tables = LightTables::new(DungeonStyle::Cathedral);
        let a = lit(&tables, 40, 15, 18, (0, 0), 6);
        let b = lit(&tables, 40, 21, 20, (3, -2), 4);
        let mut both = a.clone();
        apply_light(&mut both, &tables, 21, 20, (3, -2), 4);
        for (x, y, level) in both.iter() {
            let expected = a.get(x, y).min(b.get(x, y));
            assert_eq!(Some(level), expected, "tile ({x}, {y})");
        }
    }

    #[test]
    fn test_light_near_map_corner_is_clipped() {
        let tables = LightTables::new(DungeonStyle::Cathedral);
        let grid = lit(&tables, 10, 0, 0, (-7, -7), MAX_LIGHT_RADIUS);
        assert!(grid.as_slice().iter().all(|&l| l <= LIGHT_DARK));
        assert!(grid.get(1, 1) < Some(LIGHT_DARK));
    }

    #[test]
    fn test_light_outside_map_does_not_panic() {
        let tables = LightTables::new(DungeonStyle::Hell);
        let grid = lit(&tables, 10, -30, 50, (2, 2), 8);
        assert!(grid.as_slice().iter().all(|&l| l == LIGHT_DARK));
    }

    #[test]
    fn test_light_at_coordinate_extremes_is_skipped() {
        let tables = LightTables::new(DungeonStyle::Crypt);
        for (x, y, offset) in [
            (i32::MAX - 2, 3, (7, 0)),
            (i32::MIN, 3, (-7, 0)),
            (4, i32::MIN + 1, (0, -7)),
            (i32::MAX, i32::MAX, (0, 0)),
        ] {
            let grid = lit(&tables, 10, x, y, offset, MAX_LIGHT_RADIUS);
            assert!(grid.as_slice().iter().all(|&l| l == LIGHT_DARK), "({x}, {y})");
        }

        let mut grid = dark_grid(10);
        unlight(&mut grid, &tables, i32::MIN, i32::MAX, MAX_LIGHT_RADIUS);
        assert_eq!(grid, dark_grid(10));
    }

    #[test]
    fn test_radius_is_clamped() {
        let tables = LightTables::new(DungeonStyle::Cathedral);
        let clamped = lit(&tables, 40, 20, 20, (0, 0), 200);
        let max = lit(&tables, 40, 20, 20, (0, 0), MAX_LIGHT_RADIUS);
        assert_eq!(clamped, max);
    }

    #[test]
    fn test_unlight_restores_base_exactly() {
        for style in DungeonStyle::ALL {
            let tables = LightTables::new(style);
            let mut grid = dark_grid(40);
            for (i, cell) in [(5, 5), (19, 22), (30, 12)].into_iter().enumerate() {
                grid.base.set(cell.0, cell.1, 3 + i as u8);
            }
            grid.restore_base();
            let before = grid.clone();

            for radius in 0..=MAX_LIGHT_RADIUS {
                apply_light(&mut grid.working, &tables, 20, 20, (-7, 7), radius);
                unlight(&mut grid, &tables, 20, 20, radius);
                assert_eq!(grid, before, "{style} radius {radius} left residue");
            }
        }
    }

    #[test]
    fn test_save_pre_lighting_bakes_working_into_base() {
        let tables = LightTables::new(DungeonStyle::Cathedral);
        let mut grid = dark_grid(20);
        apply_light(&mut grid.working, &tables, 10, 10, (0, 0), 3);
        grid.save_pre_lighting();
        assert_eq!(grid.base, grid.working);
        unlight(&mut grid, &tables, 10, 10, 3);
        assert_eq!(grid.level(10, 10), LIGHT_FULL);
    }
}
