//! Line-of-sight marking from a single observer.
//!
//! Rays from [`crawl`](crate::crawl) are reflected into four quadrants. A
//! ray stops at the first opaque tile, but that tile is still marked visible
//! if one of its corner neighbours toward the observer is open, so walls that
//! bound a room are seen from inside it.

use umbra_grid::{DungeonLayout, TileFlags, TileGrid, TranslucencySet};

use crate::crawl::{RAY_COUNT, ray_steps};

/// Slack added to the vision radius when clearing an old footprint.
pub const UNVISION_MARGIN: i32 = 2;

/// Quadrant reflection: delta signs plus the two corner neighbours checked
/// when a step moves diagonally.
struct Reflection {
    sign: (i32, i32),
    corners: [(i32, i32); 2],
}

const REFLECTIONS: [Reflection; 4] = [
    Reflection {
        sign: (1, 1),
        corners: [(-1, 0), (0, -1)],
    },
    Reflection {
        sign: (-1, -1),
        corners: [(0, 1), (1, 0)],
    },
    Reflection {
        sign: (1, -1),
        corners: [(-1, 0), (0, 1)],
    },
    Reflection {
        sign: (-1, 1),
        corners: [(0, -1), (1, 0)],
    },
];

fn mark(flags: &mut TileGrid<TileFlags>, x: i32, y: i32, personal: bool) {
    if let Some(cell) = flags.get_mut(x, y) {
        cell.insert(TileFlags::VISIBLE);
        if personal {
            cell.insert(TileFlags::EXPLORED | TileFlags::LIT);
        }
    }
}

/// Marks every tile an observer at `(x, y)` with `radius` can see.
///
/// Visible tiles gain [`TileFlags::VISIBLE`]. A `personal` observer (the
/// local player) also explores and lights them, and activates the
/// translucency region of every open tile it sees.
pub fn cast_vision(
    flags: &mut TileGrid<TileFlags>,
    layout: &DungeonLayout,
    translucency: &mut TranslucencySet,
    x: i32,
    y: i32,
    radius: u8,
    personal: bool,
) {
    mark(flags, x, y, personal);

    for reflection in &REFLECTIONS {
        let (sx, sy) = reflection.sign;
        for ray in 0..RAY_COUNT {
            for (dx, dy) in ray_steps(ray, radius) {
                let (Some(cx), Some(cy)) = (x.checked_add(sx * dx), y.checked_add(sy * dy))
                else {
                    continue;
                };
                if !layout.contains(cx, cy) {
                    continue;
                }

                let blocker = layout.is_opaque(cx, cy);
                let corners = if dx > 0 && dy > 0 {
                    reflection.corners
                } else {
                    [(0, 0); 2]
                };
                let seen = corners.iter().any(|&(ax, ay)| {
                    layout.contains(cx + ax, cy + ay) && !layout.is_opaque(cx + ax, cy + ay)
                });

                if seen {
                    mark(flags, cx, cy, personal);
                    if !blocker && personal {
                        translucency.activate(layout.region(cx, cy));
                    }
                }
                if blocker {
                    break;
                }
            }
        }
    }
}

/// Clears the transient visibility bits around a former observer position.
///
/// [`TileFlags::EXPLORED`] is never cleared.
pub fn unvision(flags: &mut TileGrid<TileFlags>, x: i32, y: i32, radius: u8) {
    flags.update_square(x, y, i32::from(radius) + UNVISION_MARGIN, |cell| {
        cell.remove(TileFlags::TRANSIENT)
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
